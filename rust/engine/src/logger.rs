use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::hand::Category;
use crate::pot::PotAward;

/// A betting street. Streets only move forward within a hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    /// Hole cards dealt, no board
    Preflop,
    /// Three community cards
    Flop,
    /// Fourth community card
    Turn,
    /// Fifth community card
    River,
    /// Cards are revealed and pots awarded
    Showdown,
}

impl Street {
    pub fn next(self) -> Street {
        match self {
            Street::Preflop => Street::Flop,
            Street::Flop => Street::Turn,
            Street::Turn => Street::River,
            Street::River | Street::Showdown => Street::Showdown,
        }
    }

    /// Community cards dealt when this street opens.
    pub fn cards_dealt(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    RaiseTo,
}

/// A single entry in the hand's action log.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    pub street: Street,
    pub action: ActionKind,
    /// Chips moved for blinds and calls; the new street total for raises
    pub amount: u32,
    pub all_in: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatCards {
    pub seat: usize,
    pub cards: [Card; 2],
}

/// A hand revealed at showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShownHand {
    pub seat: usize,
    pub cards: [Card; 2],
    pub category: Category,
    pub score: u32,
}

/// How a finished hand was resolved.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandResult {
    pub hand_number: u64,
    /// Seats that received chips, in award order without duplicates
    pub winners: Vec<usize>,
    pub pots: Vec<PotAward>,
    /// Empty when the hand ended because everyone else folded
    pub showdown: Vec<ShownHand>,
}

/// Complete record of a finished hand, handed to history and coaching
/// consumers. Every seat's hole cards are included.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    pub hand_number: u64,
    /// RNG seed of the game (enables deterministic replay)
    pub seed: u64,
    pub dealer: usize,
    pub small_blind: u32,
    pub big_blind: u32,
    pub starting_stacks: Vec<u32>,
    pub hole_cards: Vec<SeatCards>,
    /// Chronological list of all actions, blinds included
    pub actions: Vec<ActionRecord>,
    pub board: Vec<Card>,
    pub result: HandResult,
    pub final_stacks: Vec<u32>,
    /// Timestamp when the record was written (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Appends hand records as JSON lines.
pub struct HandLogger<W: Write> {
    writer: W,
    written: usize,
}

impl HandLogger<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self::new(BufWriter::new(f)))
    }
}

impl<W: Write> HandLogger<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
