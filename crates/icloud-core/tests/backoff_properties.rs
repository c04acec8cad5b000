//! Property tests for the poll retry backoff schedule.

use std::time::Duration;

use icloud_core::config::PollFailurePolicy;
use proptest::prelude::*;

fn retry(initial: u64, max: u64) -> PollFailurePolicy {
    PollFailurePolicy::Retry {
        initial_backoff_ms: initial,
        max_backoff_ms: max,
        max_attempts: 3,
    }
}

proptest! {
    #[test]
    fn backoff_never_exceeds_max(
        initial in 1u64..10_000,
        max in 1u64..100_000,
        steps in 1usize..20,
    ) {
        let policy = retry(initial, max);
        let mut delay = None;
        for _ in 0..steps {
            delay = policy.next_backoff(delay);
            prop_assert!(delay.unwrap() <= Duration::from_millis(max));
        }
    }

    #[test]
    fn backoff_is_non_decreasing(initial in 1u64..10_000, max in 1u64..100_000) {
        let policy = retry(initial, max);
        let mut previous = policy.next_backoff(None).unwrap();
        for _ in 0..12 {
            let next = policy.next_backoff(Some(previous)).unwrap();
            prop_assert!(next >= previous);
            previous = next;
        }
    }

    #[test]
    fn first_delay_is_initial_when_below_max(initial in 1u64..1_000, extra in 0u64..1_000) {
        let policy = retry(initial, initial + extra);
        prop_assert_eq!(policy.next_backoff(None), Some(Duration::from_millis(initial)));
    }
}

#[test]
fn non_retry_policies_have_no_backoff() {
    assert_eq!(PollFailurePolicy::Terminate.next_backoff(None), None);
    assert_eq!(
        PollFailurePolicy::Escalate.next_backoff(Some(Duration::from_millis(5))),
        None
    );
}
