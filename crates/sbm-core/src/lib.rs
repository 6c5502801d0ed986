//! Rules and state engine for Super Beatmaker, a beatmaking roguelike.
//!
//! A run is a sequence of rooms. Each room produces one track, shaped by
//! d100 rolls on data-driven rule tables: track types, mutations, target
//! curses and mix curses. Power-ups let the player bend the rules.
//!
//! The [`Engine`] owns the single [`Run`] aggregate and advances it one
//! [`Command`] at a time. Commands issued out of phase are ignored.

pub mod command;
pub mod config;
pub mod dice;
pub mod engine;
pub mod error;
pub mod run;
pub mod tables;
pub mod targeting;

pub use command::Command;
pub use config::RunConfig;
pub use dice::{RollSource, ScriptedDice, SeededDice};
pub use engine::{Engine, PowerUpKind, RunSummary};
pub use error::{SbmError, SbmResult};
pub use run::{Curse, CurseKind, GameMode, LogEntry, Mutation, MutationEffect, Phase, Run, Track};
