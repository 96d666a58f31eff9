use std::collections::HashSet;

use figboard_shared::geometry::hit_test;
use figboard_shared::{
    BoardCommand, BoardEvent, Figure, FigureId, HitResponse, Point, Segment, DEFAULT_COLOR,
};
use uuid::Uuid;

use crate::state::{Board, MAX_COLOR_LEN, MAX_FIGURES, MAX_ID_LEN, MAX_SEGMENTS_PER_FIGURE};

/// Applies one drawing command. `None` means the command was rejected and the
/// board is unchanged.
pub fn apply_board_command(board: &mut Board, command: BoardCommand) -> Option<Vec<BoardEvent>> {
    match command {
        BoardCommand::NewFigure { id, rgb } => {
            let id = match id {
                Some(id) => valid_id(id)?,
                None => new_figure_id(),
            };
            if board.figures.iter().any(|figure| figure.id == id) {
                return None;
            }
            let rgb = sanitize_color(rgb.unwrap_or_default());
            board.figures.push(Figure::new(id.clone(), rgb.clone()));
            let overflow = board.figures.len().saturating_sub(MAX_FIGURES);
            if overflow > 0 {
                board.figures.drain(0..overflow);
            }
            board.dirty = true;

            Some(vec![BoardEvent::FigureAdded { id, rgb }])
        }
        BoardCommand::AppendSegment { figure, segment } => {
            let segment = normalize_segment(segment)?;
            let target = board.figures.iter_mut().find(|f| f.id == figure)?;
            if target.segments.len() >= MAX_SEGMENTS_PER_FIGURE {
                return None;
            }
            target.segments.push(segment);
            board.dirty = true;

            Some(vec![BoardEvent::SegmentAppended { figure, segment }])
        }
        BoardCommand::Recolor { figure, rgb } => {
            let rgb = sanitize_color(rgb);
            let target = board.figures.iter_mut().find(|f| f.id == figure)?;
            target.color = rgb.clone();
            board.dirty = true;

            Some(vec![BoardEvent::FigureRecolored { figure, rgb }])
        }
        BoardCommand::RemoveFigure { figure } => {
            let index = board.figures.iter().position(|f| f.id == figure)?;
            board.figures.remove(index);
            board.dirty = true;

            Some(vec![BoardEvent::FigureRemoved { figure }])
        }
        BoardCommand::Clear => {
            board.figures.clear();
            board.dirty = true;

            Some(vec![BoardEvent::Cleared])
        }
        BoardCommand::Load { figures } => {
            let figures = sanitize_figures(figures);
            board.figures = figures.clone();
            board.dirty = true;

            Some(vec![BoardEvent::Synced { figures }])
        }
    }
}

/// Containment and nearest-figure lookup against one snapshot of the board.
pub fn hit_test_board(board: &Board, point: Point, surface_width: f64) -> HitResponse {
    let figure = hit_test(point, &board.figures, surface_width).map(|figure| figure.id.clone());
    // A point can only be inside when some segment exists, so a hit always names a figure.
    HitResponse {
        inside: figure.is_some(),
        figure,
    }
}

pub fn new_figure_id() -> FigureId {
    FigureId::new(Uuid::now_v7().to_string())
}

/// Drops figures with unusable ids, later duplicates, segments with
/// non-finite coordinates and anything past the size limits.
pub fn sanitize_figures(figures: Vec<Figure>) -> Vec<Figure> {
    let mut seen = HashSet::new();
    let mut result = figures
        .into_iter()
        .filter_map(sanitize_figure)
        .filter(|figure| seen.insert(figure.id.clone()))
        .collect::<Vec<_>>();
    let overflow = result.len().saturating_sub(MAX_FIGURES);
    if overflow > 0 {
        result.drain(0..overflow);
    }
    result
}

fn sanitize_figure(mut figure: Figure) -> Option<Figure> {
    figure.id = valid_id(figure.id)?;
    figure.color = sanitize_color(figure.color);
    figure.segments = figure
        .segments
        .into_iter()
        .filter_map(normalize_segment)
        .take(MAX_SEGMENTS_PER_FIGURE)
        .collect();
    Some(figure)
}

fn valid_id(id: FigureId) -> Option<FigureId> {
    if id.is_empty() || id.len() > MAX_ID_LEN {
        return None;
    }
    Some(id)
}

fn normalize_segment(segment: Segment) -> Option<Segment> {
    if !segment.start.is_finite() || !segment.end.is_finite() {
        return None;
    }
    Some(segment)
}

fn sanitize_color(mut color: String) -> String {
    if color.is_empty() {
        return DEFAULT_COLOR.to_string();
    }
    if color.len() > MAX_COLOR_LEN {
        let mut end = MAX_COLOR_LEN;
        while !color.is_char_boundary(end) {
            end -= 1;
        }
        color.truncate(end);
    }
    color
}
