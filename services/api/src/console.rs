use hirepath::board::{stars, PositionBoard};
use hirepath::hiring::Position;
use std::fmt::Write;

/// Position cards as plain text: title, deadline, and status.
pub(crate) fn render_positions(positions: &[Position]) -> String {
    if positions.is_empty() {
        return "No positions found.\n".to_string();
    }

    let mut out = String::new();
    for position in positions {
        let _ = writeln!(out, "#{} {}", position.id, position.title);
        if !position.location.is_empty() {
            let _ = writeln!(out, "  Location: {}", position.location);
        }
        let _ = writeln!(
            out,
            "  Deadline: {}",
            position.application_deadline.format("%B %-d, %Y")
        );
        let _ = writeln!(out, "  Status: {}", position.status.label());
    }
    out
}

/// One block per column in flow order, each card with its star rating.
pub(crate) fn render_board(board: &PositionBoard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", board.position_name());

    for column in board.columns() {
        let _ = writeln!(out, "\n[{}] ({})", column.step.name, column.cards.len());
        for card in &column.cards {
            let _ = writeln!(
                out,
                "  {} {} (candidate {}, application {})",
                stars(card.average_score),
                card.full_name,
                card.id,
                card.application_id
            );
        }
    }
    out
}
