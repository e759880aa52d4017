//! Joke API integration

pub mod traits;
pub mod client;

pub use traits::{Joke, JokeSource};
pub use client::{OfficialJokeClient, DEFAULT_ENDPOINT};
