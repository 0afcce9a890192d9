use abi::{BookingStatus, Error, LifecycleEvent};

/// The transition table. Total over (state, event): every pair not listed
/// fails with `InvalidTransition` instead of silently succeeding.
///
/// ```text
/// Created   --confirm--> Confirmed
/// Created   --cancel---> Cancelled
/// Confirmed --cancel---> Cancelled
/// Confirmed --complete-> Completed
/// ```
pub fn transition(from: BookingStatus, event: LifecycleEvent) -> Result<BookingStatus, Error> {
    use BookingStatus::*;
    use LifecycleEvent::*;

    match (from, event) {
        (Created, Confirm) => Ok(Confirmed),
        (Created, Cancel) | (Confirmed, Cancel) => Ok(Cancelled),
        (Confirmed, Complete) => Ok(Completed),
        (from, event) => Err(Error::InvalidTransition { from, event }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;
    use LifecycleEvent::*;

    #[test]
    fn allowed_transitions() {
        assert_eq!(transition(Created, Confirm).unwrap(), Confirmed);
        assert_eq!(transition(Created, Cancel).unwrap(), Cancelled);
        assert_eq!(transition(Confirmed, Cancel).unwrap(), Cancelled);
        assert_eq!(transition(Confirmed, Complete).unwrap(), Completed);
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for from in [Cancelled, Completed] {
            for event in [Confirm, Cancel, Complete] {
                assert_eq!(
                    transition(from, event).unwrap_err(),
                    Error::InvalidTransition { from, event }
                );
            }
        }
    }

    #[test]
    fn undefined_pairs_are_rejected() {
        assert_eq!(
            transition(Created, Complete).unwrap_err(),
            Error::InvalidTransition { from: Created, event: Complete }
        );
        assert_eq!(
            transition(Confirmed, Confirm).unwrap_err(),
            Error::InvalidTransition { from: Confirmed, event: Confirm }
        );
    }
}
