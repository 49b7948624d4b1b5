mod auction;
mod event;

pub use {
    auction::*,
    event::*,
};
