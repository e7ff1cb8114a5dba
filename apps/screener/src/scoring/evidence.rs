use crate::evidence::EvidenceProfile;

/// Evidence score in [0, 100] from public code-hosting activity.
///
/// original repos (≤10) 30 pts, active repos (≤5) 25 pts, stars (≤50) 15 pts,
/// languages (≤5) 15 pts, originality ratio 15 pts.
pub fn evidence_score(profile: &EvidenceProfile) -> f64 {
    if profile.is_empty() {
        return 0.0;
    }

    let share = |value: f64, cap: f64| value.min(cap) / cap;

    let originality = if profile.total_repos > 0 {
        profile.original_repos as f64 / profile.total_repos as f64
    } else {
        0.0
    };

    30.0 * share(profile.original_repos as f64, 10.0)
        + 25.0 * share(profile.active_repos as f64, 5.0)
        + 15.0 * share(profile.total_stars as f64, 50.0)
        + 15.0 * share(profile.languages.len() as f64, 5.0)
        + 15.0 * originality
}
