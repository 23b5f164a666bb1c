//! Pure scheduling computations
//!
//! Everything here is synchronous and free of I/O: given bookings and
//! business hours it answers "is this time open", "does this collide",
//! "where does this card go" and "which slots can be offered".

pub mod conflict;
pub mod hours;
pub mod layout;
pub mod slots;
