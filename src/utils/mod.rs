pub mod ticket;

pub use ticket::{extract_ticket_number, pad_ticket_number};
