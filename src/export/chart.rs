use std::fmt;

use crate::table::{ColumnSchema, MeasurementTable};

use super::error::ExportError;

/// X/Y column picker for the scatter chart.
///
/// Indices refer to schema positions. After any structural change call
/// [`refresh`](Self::refresh) so no selection points past the last column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisSelection {
    options: Vec<String>,
    x: Option<usize>,
    y: Option<usize>,
}

impl AxisSelection {
    /// Picker populated from `schema`
    pub fn from_schema(schema: &ColumnSchema) -> Self {
        let mut selection = Self::default();
        selection.refresh(schema);
        selection
    }

    /// Rebuild the option list. Selections still in range are kept, others fall
    /// back to the first column; Y starts on the second column when there is one.
    pub fn refresh(&mut self, schema: &ColumnSchema) {
        self.options = schema
            .labels()
            .enumerate()
            .map(|(i, label)| {
                if label.is_empty() {
                    format!("Column {}", i + 1)
                } else {
                    label.to_string()
                }
            })
            .collect();

        let len = self.options.len();
        let first = if len > 0 { Some(0) } else { None };

        self.x = self.x.filter(|x| *x < len).or(first);
        self.y = match self.y {
            Some(y) if y < len => Some(y),
            None if len > 1 => Some(1),
            _ => first,
        };
    }

    /// Option captions, one per column
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Selected X column
    pub fn x(&self) -> Option<usize> {
        self.x
    }

    /// Selected Y column
    pub fn y(&self) -> Option<usize> {
        self.y
    }

    /// Choose both axes; positions must be listed options
    pub fn select(&mut self, x: usize, y: usize) -> bool {
        if x < self.options.len() && y < self.options.len() {
            self.x = Some(x);
            self.y = Some(y);
            true
        } else {
            false
        }
    }
}

/// Two table columns projected into an ordered point series
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    /// Series caption, `"<Y> vs <X>"`
    pub label: String,
    /// X axis title
    pub x_label: String,
    /// Y axis title
    pub y_label: String,
    /// Points in row order
    pub points: Vec<(f64, f64)>,
}

impl PointSeries {
    /// Smallest and largest X and Y, as `((x_min, x_max), (y_min, y_max))`
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let (&(x0, y0), rest) = self.points.split_first()?;
        Some(rest.iter().fold(
            ((x0, x0), (y0, y0)),
            |((x_min, x_max), (y_min, y_max)), &(x, y)| {
                ((x_min.min(x), x_max.max(x)), (y_min.min(y), y_max.max(y)))
            },
        ))
    }
}

impl fmt::Display for PointSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} points)", self.label, self.points.len())?;
        for (x, y) in &self.points {
            write!(f, "\n  {:>12} {:>12}", x, y)?;
        }
        Ok(())
    }
}

/// Project columns `x` and `y` of every row into points.
///
/// Rows that are too short or whose cells in either column hold no number
/// (blank, free text, `Err`) are skipped. Fails when either position is not a
/// column or no point remains.
pub fn project(table: &MeasurementTable, x: usize, y: usize) -> Result<PointSeries, ExportError> {
    let label_of = |position: usize| {
        table
            .schema()
            .get(position)
            .map(|c| c.label.clone())
            .ok_or(ExportError::AxisOutOfRange {
                position,
                len: table.schema().len(),
            })
    };
    let x_label = label_of(x)?;
    let y_label = label_of(y)?;

    let points: Vec<(f64, f64)> = table
        .rows()
        .iter()
        .filter(|row| row.len() > x.max(y))
        .filter_map(|row| Some((row.number(x)?, row.number(y)?)))
        .collect();

    if points.is_empty() {
        return Err(ExportError::NoPoints);
    }

    Ok(PointSeries {
        label: format!("{} vs {}", y_label, x_label),
        x_label,
        y_label,
        points,
    })
}
