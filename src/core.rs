mod daily;
mod fetcher;
mod interval;
mod source;

pub use self::{
    daily::SumDaily,
    fetcher::Fetcher,
    interval::{Interval, merge},
    source::{Endpoint, StatsSource},
};
