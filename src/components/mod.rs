pub mod schedule;
pub mod scoreboard;
