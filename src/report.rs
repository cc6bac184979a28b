//! Plain-text reports over a finished schedule.
//!
//! Every function is read-only and returns the rendered text; printing is up
//! to the caller.

use crate::metrics::Metrics;
use crate::optimizer::OptimizeStats;
use crate::participants::Participants;
use crate::schedule::{PlayerId, Schedule};

fn row_of(values: impl IntoIterator<Item = impl std::fmt::Display>) -> String {
    values.into_iter().map(|v| format!("{:>3}", v)).collect()
}

/// Current players of every slot, one line per game.
pub fn slots_listing(schedule: &Schedule) -> String {
    let mut lines = vec!["*** Slots:".to_string()];
    for game in &schedule.games {
        if let Some(slot) = schedule.slot(game.id) {
            lines.push(format!("Slot {:>2}: {}", game.id, row_of(slot.sorted_players())));
        }
    }
    lines.join("\n")
}

/// The full opponents matrix, one row per player.
pub fn opponents_matrix(schedule: &Schedule) -> String {
    let metrics = Metrics::new(schedule);
    let matrix = metrics.opponents_matrix();

    let mut lines = vec!["*** Opponents matrix:".to_string()];
    for player in 0..matrix.size() {
        lines.push(format!("{:>2}: {}", player, row_of(matrix.row(player))));
    }
    lines.join("\n")
}

/// How many player pairs met each number of times.
pub fn pairs_histogram(schedule: &Schedule) -> String {
    let metrics = Metrics::new(schedule);

    let mut lines = vec!["*** Pairs histogram:".to_string()];
    for (meetings, pairs) in metrics.calc_pairs_histogram() {
        if pairs > 0 {
            lines.push(format!("{:>2} : {:>3} pairs", meetings, pairs));
        }
    }
    lines.join("\n")
}

/// Seat counts per player, one row per player and one column per seat.
pub fn seats_matrix(schedule: &Schedule) -> String {
    let metrics = Metrics::new(schedule);

    let mut lines = vec!["*** Seats matrix:".to_string()];
    for player in 0..schedule.num_players() {
        let seats = metrics.calc_player_seats_histogram(player);
        lines.push(format!("{:>2}: {}", player, row_of(seats)));
    }
    lines.join("\n")
}

/// Every game with its seated players.
pub fn games_listing(schedule: &Schedule) -> String {
    let mut lines = vec!["*** Games:".to_string()];
    for game in &schedule.games {
        lines.push(format!("Game {:>2}: {}", game.id, row_of(&game.players)));
    }
    lines.join("\n")
}

/// Rounds with their games, using participant names when given.
pub fn schedule_by_rounds(schedule: &Schedule, participants: Option<&Participants>) -> String {
    let label = |player: PlayerId| -> String {
        participants
            .and_then(|p| p.name(player))
            .map(str::to_string)
            .unwrap_or_else(|| player.to_string())
    };

    let mut lines = vec!["*** Schedule by games:".to_string()];
    for round in &schedule.rounds {
        lines.push(String::new());
        lines.push(format!("Round: {}", round.id + 1));
        for &game_id in &round.game_ids {
            let Some(game) = schedule.game(game_id) else {
                continue;
            };
            let players: Vec<String> = game.players.iter().map(|&p| label(p)).collect();
            lines.push(format!("Game {:>2}: {}", game.id, players.join(", ")));
        }
    }
    lines.join("\n")
}

/// One line per optimization run plus the winner.
pub fn run_summary(stats: &OptimizeStats) -> String {
    let mut lines = vec!["*** Optimization runs:".to_string()];
    for run in &stats.runs {
        lines.push(format!(
            "Run {:>2}: score {:>10.4} -> {:>10.4} | accepted {:>6} of {:>8} ({:.2}%) | {:.2}s",
            run.run + 1,
            run.initial_score,
            run.final_score,
            run.accepted,
            run.iterations,
            100.0 * run.acceptance_rate(),
            run.elapsed_seconds
        ));
    }
    if let (Some(run), Some(score)) = (stats.best_run, stats.best_score) {
        lines.push(format!("Best: run {} with score {:.4}", run + 1, score));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::RunStats;
    use crate::schedule::{Configuration, Game, Round};

    fn two_table_schedule() -> Schedule {
        let config = Configuration::new(20, 2, 1, 2, 1);
        let games = vec![
            Game::new(0, (0..10).collect()),
            Game::new(1, (10..20).collect()),
        ];
        Schedule::new(config, vec![Round::new(0, vec![0, 1])], games)
    }

    #[test]
    fn test_opponents_matrix_report() {
        let report = opponents_matrix(&two_table_schedule());
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 21);
        assert!(lines[1].starts_with(" 0:   0  1  1"));
    }

    #[test]
    fn test_pairs_histogram_report() {
        let report = pairs_histogram(&two_table_schedule());
        // 190 pairs: 90 met once, 100 never met.
        assert!(report.contains(" 0 : 100 pairs"));
        assert!(report.contains(" 1 :  90 pairs"));
    }

    #[test]
    fn test_schedule_by_rounds_uses_names() {
        let schedule = two_table_schedule();
        let participants = Participants::create(20);

        let named = schedule_by_rounds(&schedule, Some(&participants));
        assert!(named.contains("Round: 1"));
        assert!(named.contains("Game  0: Alder, Birch"));

        let plain = schedule_by_rounds(&schedule, None);
        assert!(plain.contains("Game  1: 10, 11"));
    }

    #[test]
    fn test_seats_and_slots_reports() {
        let mut schedule = two_table_schedule();
        let seats = seats_matrix(&schedule);
        assert!(seats.lines().nth(1).unwrap().starts_with(" 0:   1  0"));
        assert!(games_listing(&schedule).contains("Game  1:  10 11"));

        schedule.generate_slots_from_games();
        let slots = slots_listing(&schedule);
        assert_eq!(slots.lines().count(), 3);
    }

    #[test]
    fn test_run_summary() {
        let stats = OptimizeStats {
            runs: vec![RunStats {
                run: 0,
                initial_score: 10.0,
                final_score: 4.0,
                iterations: 100,
                accepted: 5,
                ..Default::default()
            }],
            best_run: Some(0),
            best_score: Some(4.0),
            elapsed_seconds: 0.1,
        };
        let summary = run_summary(&stats);
        assert!(summary.contains("accepted      5 of      100 (5.00%)"));
        assert!(summary.ends_with("Best: run 1 with score 4.0000"));
    }
}
