use crate::models::{CandidateQuery, Profile};

/// Check whether a candidate profile may be shown at all
///
/// Only approved, non-banned profiles are visible in discovery.
#[inline]
pub fn is_visible(profile: &Profile) -> bool {
    profile.is_discoverable()
}

/// Check the inclusive age range
#[inline]
pub fn within_age_range(profile: &Profile, min_age: u8, max_age: u8) -> bool {
    profile.age >= min_age && profile.age <= max_age
}

/// Check the optional exact-gender filter
#[inline]
pub fn matches_gender(profile: &Profile, gender: Option<&str>) -> bool {
    match gender {
        Some(wanted) => profile.gender == wanted,
        None => true,
    }
}

/// Check if a profile satisfies every constraint of a candidate query
///
/// Excludes the viewer, invisible profiles, profiles outside the age
/// range or gender filter, and anything in the exclusion list (the
/// viewer's swipe history).
#[inline]
pub fn matches_query_constraints(profile: &Profile, query: &CandidateQuery) -> bool {
    if profile.id == query.viewer_id {
        return false;
    }

    if !is_visible(profile) {
        return false;
    }

    if !within_age_range(profile, query.min_age, query.max_age) {
        return false;
    }

    if !matches_gender(profile, query.gender.as_deref()) {
        return false;
    }

    !query.exclude_ids.contains(&profile.id)
}
