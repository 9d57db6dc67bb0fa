mod enrich;
mod genre;
mod pointer;
mod status;
mod tally;

pub(crate) use enrich::*;
pub(crate) use genre::*;
pub(crate) use pointer::*;
pub(crate) use status::*;
pub(crate) use tally::*;
