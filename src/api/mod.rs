mod client;
mod drivers;
mod lists;
mod records;

pub use client::DriverLogClient;
pub use lists::ListKind;
