use abi::{DateRange, Reservation};

/// Whether a candidate stay fits around the active reservations of a room.
///
/// Pure and deterministic: the caller supplies the active set (reservations
/// still holding the room), so this is safe to re-run under retry. Degenerate
/// candidates (start >= end) are rejected by request validation before this
/// point.
pub fn is_available(candidate: &DateRange, active: &[Reservation]) -> bool {
    active.iter().all(|r| !candidate.overlaps(&r.stay))
}
