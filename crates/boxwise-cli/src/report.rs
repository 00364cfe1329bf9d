use std::fmt;

use boxwise_engine::{Move, StartPosition};
use boxwise_evaluator::genome::Genome;
use boxwise_training::tournament::TournamentResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON summary of one tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentReport {
    pub generated_at: DateTime<Utc>,
    pub generation: u64,
    pub width: u8,
    pub height: u8,
    pub start_lines: Vec<Move>,
    /// In pool order.
    pub standings: Vec<ReportStanding>,
    /// `pairing_matrix[i][j]`: points DNA `i` took against DNA `j` (0 to 4).
    pub pairing_matrix: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStanding {
    pub dna: usize,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    pub points: u32,
    pub games: u32,
    pub average_think_ms: f64,
    pub genome: Genome,
}

impl TournamentReport {
    pub fn new(
        generation: u64,
        start: &StartPosition,
        genomes: &[Genome],
        result: &TournamentResult,
    ) -> Self {
        let standings = std::iter::zip(genomes, &result.standings)
            .enumerate()
            .map(|(dna, (genome, standing))| ReportStanding {
                dna,
                wins: standing.wins,
                ties: standing.ties,
                losses: standing.losses,
                points: standing.points(),
                games: standing.games,
                average_think_ms: standing.average_think_time().as_secs_f64() * 1000.0,
                genome: *genome,
            })
            .collect();
        Self {
            generated_at: Utc::now(),
            generation,
            width: start.board.width(),
            height: start.board.height(),
            start_lines: start.lines.clone(),
            standings,
            pairing_matrix: result.pairing_matrix(),
        }
    }
}

/// Standings best first, then the cross table.
impl fmt::Display for TournamentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Generation {} on {}x{} ({} start lines)",
            self.generation,
            self.width,
            self.height,
            self.start_lines.len()
        )?;
        writeln!(
            f,
            "{:>4} {:>5} {:>5} {:>6} {:>6} {:>10}",
            "DNA", "Wins", "Ties", "Losses", "Points", "ms/game"
        )?;
        let mut ranked = self.standings.iter().collect::<Vec<_>>();
        ranked.sort_by_key(|standing| std::cmp::Reverse(standing.points));
        for s in ranked {
            writeln!(
                f,
                "{:>4} {:>5} {:>5} {:>6} {:>6} {:>10.3}",
                s.dna, s.wins, s.ties, s.losses, s.points, s.average_think_ms
            )?;
        }

        writeln!(f)?;
        write!(f, "{:>4}", "")?;
        for j in 0..self.pairing_matrix.len() {
            write!(f, " {j:>3}")?;
        }
        writeln!(f)?;
        for (i, row) in self.pairing_matrix.iter().enumerate() {
            write!(f, "{i:>4}")?;
            for points in row {
                write!(f, " {points:>3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
