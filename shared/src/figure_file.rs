use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

use crate::{Figure, FigureId};

#[derive(Debug)]
pub enum FigureFileError {
    InvalidData(String),
    DuplicateId(FigureId),
    NonFinite(FigureId),
    Encode(serde_json::Error),
}

impl fmt::Display for FigureFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FigureFileError::InvalidData(reason) => write!(f, "invalid figure file: {reason}"),
            FigureFileError::DuplicateId(id) => write!(f, "duplicate figure id {id}"),
            FigureFileError::NonFinite(id) => {
                write!(f, "figure {id} has a non-finite coordinate")
            }
            FigureFileError::Encode(error) => write!(f, "cannot encode figures: {error}"),
        }
    }
}

impl std::error::Error for FigureFileError {}

/// Saved boards are a bare JSON array of figures, the same shape the
/// browser download produces. JSON has no NaN or infinity, so figures
/// holding one are refused instead of being written as `null`.
pub fn encode_figure_file(figures: &[Figure]) -> Result<String, FigureFileError> {
    if let Some(figure) = figures.iter().find(|figure| {
        figure
            .segments
            .iter()
            .any(|segment| !segment.start.is_finite() || !segment.end.is_finite())
    }) {
        return Err(FigureFileError::NonFinite(figure.id.clone()));
    }
    serde_json::to_string_pretty(figures).map_err(FigureFileError::Encode)
}

pub fn decode_figure_file(text: &str) -> Result<Vec<Figure>, FigureFileError> {
    let figures = parse_figures(text)?;
    let mut seen = HashSet::new();
    for figure in &figures {
        if !seen.insert(&figure.id) {
            return Err(FigureFileError::DuplicateId(figure.id.clone()));
        }
    }
    Ok(figures)
}

fn parse_figures(text: &str) -> Result<Vec<Figure>, FigureFileError> {
    let trimmed = text.trim();
    let Some(payload) = extract_data_url_payload(trimmed) else {
        return try_parse_figures(trimmed);
    };
    if let Ok(figures) = try_parse_figures(payload) {
        return Ok(figures);
    }
    let decoded = urlencoding::decode(payload)
        .map_err(|error| FigureFileError::InvalidData(error.to_string()))?;
    try_parse_figures(&decoded)
}

fn try_parse_figures(text: &str) -> Result<Vec<Figure>, FigureFileError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FigureFileData {
        Bare(Vec<Figure>),
        Wrapped { figures: Vec<Figure> },
    }
    match serde_json::from_str::<FigureFileData>(text) {
        Ok(FigureFileData::Bare(figures)) | Ok(FigureFileData::Wrapped { figures }) => Ok(figures),
        Err(error) => Err(FigureFileError::InvalidData(error.to_string())),
    }
}

fn extract_data_url_payload(text: &str) -> Option<&str> {
    if !text.starts_with("data:") {
        return None;
    }
    let (_, payload) = text.split_once(',')?;
    Some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point, Segment};

    fn sample() -> Vec<Figure> {
        let mut first = Figure::new(FigureId::new("1"), "#000");
        first.segments = vec![
            Segment::new(Point::new(0.0, 0.0), Point::new(4.0, 0.0)),
            Segment::new(Point::new(4.0, 0.0), Point::new(4.0, 4.0)),
        ];
        let mut second = Figure::new(FigureId::new("2"), "#ff0000");
        second
            .segments
            .push(Segment::new(Point::new(9.0, 9.0), Point::new(9.5, 9.5)));
        vec![first, second]
    }

    #[test]
    fn saved_file_loads_back_in_order() {
        let figures = sample();
        let text = encode_figure_file(&figures).unwrap();
        assert_eq!(decode_figure_file(&text).unwrap(), figures);
    }

    #[test]
    fn accepts_wrapped_and_data_url_payloads() {
        let figures = sample();
        let bare = serde_json::to_string(&figures).unwrap();
        let wrapped = format!("{{\"figures\": {bare}}}");
        assert_eq!(decode_figure_file(&wrapped).unwrap(), figures);

        let data_url = format!("data:application/json,{bare}");
        assert_eq!(decode_figure_file(&data_url).unwrap(), figures);

        let escaped = format!(
            "data:application/json;charset=utf-8,{}",
            urlencoding::encode(&bare)
        );
        assert_eq!(decode_figure_file(&escaped).unwrap(), figures);
    }

    #[test]
    fn accepts_browser_export_with_numeric_ids() {
        let text = r##"[{"id":1700000000001,"rgb":"#00f","lines":[{"start":{"x":1,"y":2},"end":{"x":3,"y":4}}]}]"##;
        let figures = decode_figure_file(text).unwrap();
        assert_eq!(figures.len(), 1);
        assert_eq!(figures[0].id.as_str(), "1700000000001");
        assert_eq!(figures[0].segments[0].end, Point::new(3.0, 4.0));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut figures = sample();
        figures[1].id = FigureId::new("1");
        let text = encode_figure_file(&figures).unwrap();
        assert!(matches!(
            decode_figure_file(&text),
            Err(FigureFileError::DuplicateId(id)) if id.as_str() == "1"
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            decode_figure_file("not json"),
            Err(FigureFileError::InvalidData(_))
        ));
        assert!(decode_figure_file("{\"strokes\": []}").is_err());
    }

    #[test]
    fn refuses_to_encode_non_finite_coordinates() {
        let mut figures = sample();
        figures[1].segments[0].end = Point::new(f64::NAN, 1.0);
        assert!(matches!(
            encode_figure_file(&figures),
            Err(FigureFileError::NonFinite(id)) if id.as_str() == "2"
        ));
        figures[1].segments[0].end = Point::new(1.0, f64::INFINITY);
        assert!(encode_figure_file(&figures).is_err());
    }

    #[test]
    fn empty_array_is_an_empty_board() {
        assert!(decode_figure_file("[]").unwrap().is_empty());
    }
}
