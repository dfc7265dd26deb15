use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::document::collect_text;
use crate::error::TableParseError;

pub(crate) const MAX_SPAN: usize = 1000;

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid tr selector"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("valid cell selector"));

/// Raw cell text with a provisional header, every row padded to the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractedTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    fn from_rows(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);
        let mut header = header;
        header.resize(width, String::new());
        Self {
            header,
            rows: normalize_rows(&rows, width),
        }
    }
}

/// Reads the first `<table>` in `table_html`, preferring the span-aware grid
/// reader and falling back to plain row-by-row extraction.
pub(crate) fn extract_cells(table_html: &str) -> Option<ExtractedTable> {
    let fragment = Html::parse_fragment(table_html);
    let table = fragment.select(&TABLE_SELECTOR).next()?;

    match parse_structured(table) {
        Ok(extracted) => return Some(extracted),
        Err(error) => debug!(%error, "structured table read failed, using manual extraction"),
    }

    let mut rows = parse_manual(table);
    if rows.is_empty() {
        return None;
    }
    let header = rows.remove(0);
    Some(ExtractedTable::from_rows(header, rows))
}

fn direct_rows<'a>(table: ElementRef<'a>) -> Vec<(ElementRef<'a>, bool)> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push((child, false)),
            section @ ("thead" | "tbody" | "tfoot") => {
                let in_thead = section == "thead";
                rows.extend(
                    child
                        .children()
                        .filter_map(ElementRef::wrap)
                        .filter(|inner| inner.value().name() == "tr")
                        .map(|inner| (inner, in_thead)),
                );
            }
            _ => {}
        }
    }
    rows
}

fn direct_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .collect()
}

fn parse_span(value: Option<&str>) -> Result<usize, TableParseError> {
    let digits = value
        .map(str::trim)
        .unwrap_or_default()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>();
    let span = digits.parse::<usize>().unwrap_or(1).max(1);
    if span > MAX_SPAN {
        return Err(TableParseError::SpanTooLarge {
            span,
            limit: MAX_SPAN,
        });
    }
    Ok(span)
}

fn take_carried(carried: &mut [Option<(usize, String)>], col: usize) -> Option<String> {
    let (remaining, text) = carried.get_mut(col)?.take()?;
    if remaining > 1 {
        carried[col] = Some((remaining - 1, text.clone()));
    }
    Some(text)
}

/// Grid reader honoring `colspan`/`rowspan`: a spanned cell repeats its text
/// in every slot it covers. Leading `<thead>` or all-`<th>` rows form the
/// header; without them the header is the positional labels `0..n`.
fn parse_structured(table: ElementRef<'_>) -> Result<ExtractedTable, TableParseError> {
    let rows = direct_rows(table);
    if rows.is_empty() {
        return Err(TableParseError::NoRows);
    }

    let mut carried: Vec<Option<(usize, String)>> = Vec::new();
    let mut grid: Vec<Vec<String>> = Vec::new();
    let mut header_rows = 0_usize;
    let mut in_header = true;

    for (row, in_thead) in rows {
        let cells = direct_cells(row);
        let all_th = !cells.is_empty() && cells.iter().all(|cell| cell.value().name() == "th");
        let mut out: Vec<String> = Vec::new();
        let mut pending = cells.into_iter();

        loop {
            if let Some(text) = take_carried(&mut carried, out.len()) {
                out.push(text);
                continue;
            }
            let Some(cell) = pending.next() else {
                break;
            };

            let colspan = parse_span(cell.value().attr("colspan"))?;
            let rowspan = parse_span(cell.value().attr("rowspan"))?;
            let text = collect_text(cell);
            for _ in 0..colspan {
                let col = out.len();
                if rowspan > 1 {
                    if carried.len() <= col {
                        carried.resize(col + 1, None);
                    }
                    carried[col] = Some((rowspan - 1, text.clone()));
                }
                out.push(text.clone());
            }
        }

        if let Some(last) = carried.iter().rposition(Option::is_some) {
            while out.len() <= last {
                let text = take_carried(&mut carried, out.len()).unwrap_or_default();
                out.push(text);
            }
        }

        if out.is_empty() {
            continue;
        }
        if in_header && (in_thead || all_th) {
            header_rows += 1;
        } else {
            in_header = false;
        }
        grid.push(out);
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return Err(TableParseError::NoColumns);
    }

    let grid = normalize_rows(&grid, width);
    let header = if header_rows == 0 {
        (0..width).map(|index| index.to_string()).collect()
    } else {
        combine_header_rows(&grid[..header_rows], width)
    };

    Ok(ExtractedTable {
        header,
        rows: grid[header_rows..].to_vec(),
    })
}

fn combine_header_rows(rows: &[Vec<String>], width: usize) -> Vec<String> {
    (0..width)
        .map(|col| {
            let mut parts: Vec<&str> = Vec::new();
            for row in rows {
                let fragment = row[col].as_str();
                if !fragment.is_empty() && parts.last() != Some(&fragment) {
                    parts.push(fragment);
                }
            }
            parts.join(" ")
        })
        .collect()
}

/// Every `<tr>` in the table, text of every `<td>`/`<th>` in it; rows
/// without cells are skipped.
fn parse_manual(table: ElementRef<'_>) -> Vec<Vec<String>> {
    table
        .select(&ROW_SELECTOR)
        .map(|row| row.select(&CELL_SELECTOR).map(collect_text).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect()
}

pub(crate) fn normalize_rows(rows: &[Vec<String>], width: usize) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            let mut out = row.clone();
            out.resize(width, String::new());
            out
        })
        .collect()
}
