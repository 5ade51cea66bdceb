//! Action recommendation from travel-time profiles.

use crate::config::{ActionPolicy, EngineConfig};
use crate::domain::{Action, DepartureStatus, EventStatus, TravelTimeProfile};

/// Decide status and action for one departure.
///
/// `minutes` is the time until departure, `None` if unknown. The first
/// matching rule wins:
///
/// 1. cancelled: wait for the next one, status stays cancelled
/// 2. no travel time configured: ask for one
/// 3. unknown or negative minutes: wait for the next one
/// 4. less than the fastest estimate: wait for the next one
/// 5. less than the slowest estimate: hurry
/// 6. up to the slowest estimate plus the wait buffer: walk slowly
/// 7. beyond that: depends on [`ActionPolicy`]
///
/// # Examples
///
/// ```
/// use home_planner::config::EngineConfig;
/// use home_planner::domain::{Action, EventStatus, TravelTime, TravelTimeProfile};
/// use home_planner::engine::recommend;
///
/// let times = [("fast", 10), ("slow", 20)]
///     .map(|(label, minutes)| TravelTime {
///         id: None,
///         route_id: "r1".into(),
///         label: label.into(),
///         minutes,
///     })
///     .to_vec();
/// let profile = TravelTimeProfile::new(times);
/// let config = EngineConfig::default();
///
/// let (_, action) = recommend(Some(15), &profile, EventStatus::OnTime, &config);
/// assert_eq!(action, Action::Hurry);
/// ```
pub fn recommend(
    minutes: Option<i64>,
    profile: &TravelTimeProfile,
    status: EventStatus,
    config: &EngineConfig,
) -> (DepartureStatus, Action) {
    let shown = DepartureStatus::from(status);

    if status == EventStatus::Cancelled {
        return (shown, Action::WaitForNext);
    }

    let (Some(fastest), Some(slowest)) = (profile.fastest(), profile.slowest()) else {
        return (shown, Action::AddTravelTime);
    };

    let minutes = match minutes {
        Some(m) if m >= 0 => m,
        _ => return (shown, Action::WaitForNext),
    };

    if minutes < fastest {
        (shown, Action::WaitForNext)
    } else if minutes < slowest {
        (shown, Action::Hurry)
    } else if minutes <= slowest + config.wait_buffer_mins {
        (shown, Action::WalkSlowly)
    } else {
        match config.policy {
            ActionPolicy::FiveBucket => (DepartureStatus::Waiting, Action::Wait),
            ActionPolicy::FourBucket => (shown, Action::WalkSlowly),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TravelTime;

    fn profile(minutes: &[u32]) -> TravelTimeProfile {
        TravelTimeProfile::new(
            minutes
                .iter()
                .enumerate()
                .map(|(i, &m)| TravelTime {
                    id: Some(format!("t{i}")),
                    route_id: "r1".into(),
                    label: format!("estimate {i}"),
                    minutes: m,
                })
                .collect(),
        )
    }

    fn five() -> EngineConfig {
        EngineConfig::default()
    }

    fn four() -> EngineConfig {
        EngineConfig::default().with_policy(ActionPolicy::FourBucket)
    }

    #[test]
    fn twenty_five_minutes_is_not_hurry() {
        let p = profile(&[10, 20]);
        assert_eq!(
            recommend(Some(25), &p, EventStatus::OnTime, &five()),
            (DepartureStatus::OnTime, Action::WalkSlowly)
        );
        assert_eq!(
            recommend(Some(25), &p, EventStatus::OnTime, &four()),
            (DepartureStatus::OnTime, Action::WalkSlowly)
        );
    }

    #[test]
    fn fifteen_minutes_is_hurry() {
        let p = profile(&[10, 20]);
        assert_eq!(
            recommend(Some(15), &p, EventStatus::Delayed, &five()),
            (DepartureStatus::Delayed, Action::Hurry)
        );
    }

    #[test]
    fn five_minutes_is_too_late() {
        let p = profile(&[10, 20]);
        assert_eq!(
            recommend(Some(5), &p, EventStatus::OnTime, &five()).1,
            Action::WaitForNext
        );
    }

    #[test]
    fn bucket_edges() {
        let p = profile(&[20, 10]);
        let config = five();
        let action = |m| recommend(Some(m), &p, EventStatus::OnTime, &config).1;

        assert_eq!(action(0), Action::WaitForNext);
        assert_eq!(action(9), Action::WaitForNext);
        assert_eq!(action(10), Action::Hurry);
        assert_eq!(action(19), Action::Hurry);
        assert_eq!(action(20), Action::WalkSlowly);
        assert_eq!(action(35), Action::WalkSlowly);
        assert_eq!(action(36), Action::Wait);
    }

    #[test]
    fn beyond_buffer_depends_on_policy() {
        let p = profile(&[10, 20]);
        assert_eq!(
            recommend(Some(60), &p, EventStatus::Delayed, &five()),
            (DepartureStatus::Waiting, Action::Wait)
        );
        assert_eq!(
            recommend(Some(60), &p, EventStatus::Delayed, &four()),
            (DepartureStatus::Delayed, Action::WalkSlowly)
        );
        assert_eq!(
            recommend(Some(60), &p, EventStatus::OnTime, &five().with_wait_buffer(45)),
            (DepartureStatus::OnTime, Action::WalkSlowly)
        );
    }

    #[test]
    fn missing_profile_asks_for_travel_time() {
        assert_eq!(
            recommend(Some(30), &TravelTimeProfile::empty(), EventStatus::OnTime, &five()),
            (DepartureStatus::OnTime, Action::AddTravelTime)
        );
        assert_eq!(
            recommend(Some(-4), &TravelTimeProfile::empty(), EventStatus::Delayed, &five()),
            (DepartureStatus::Delayed, Action::AddTravelTime)
        );
    }

    #[test]
    fn single_estimate_is_fast_and_slow() {
        let p = profile(&[12]);
        let config = five();
        let action = |m| recommend(Some(m), &p, EventStatus::OnTime, &config).1;

        assert_eq!(action(11), Action::WaitForNext);
        assert_eq!(action(12), Action::WalkSlowly);
        assert_eq!(action(27), Action::WalkSlowly);
        assert_eq!(action(28), Action::Wait);
    }

    #[test]
    fn past_or_unknown_departure() {
        let p = profile(&[10, 20]);
        assert_eq!(recommend(Some(-1), &p, EventStatus::OnTime, &five()).1, Action::WaitForNext);
        assert_eq!(recommend(None, &p, EventStatus::OnTime, &five()).1, Action::WaitForNext);
    }

    #[test]
    fn cancelled_always_waits_for_next() {
        assert_eq!(
            recommend(Some(15), &profile(&[10, 20]), EventStatus::Cancelled, &five()),
            (DepartureStatus::Cancelled, Action::WaitForNext)
        );
        assert_eq!(
            recommend(None, &TravelTimeProfile::empty(), EventStatus::Cancelled, &five()),
            (DepartureStatus::Cancelled, Action::WaitForNext)
        );
    }
}
