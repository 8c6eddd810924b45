pub mod annotation;
pub mod codon;
pub mod extract;
pub mod io;
