// Skill matching: alias normalization, the local matcher, the choice between
// local and external match results, and gap analysis over the chosen set.

pub mod coordinator;
pub mod gaps;
pub mod matcher;
pub mod models;
pub mod synonyms;
