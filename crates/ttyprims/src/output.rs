use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use ttyprims_termios::BaudRate;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ChunkOutput<'a> {
    kind: &'static str,
    size: usize,
    data: String,
    port: &'a str,
    timestamp: String,
}

#[derive(Serialize)]
struct LineOutput<'a> {
    kind: &'static str,
    line: &'a str,
    port: &'a str,
    timestamp: String,
}

#[derive(Serialize)]
struct BaudOutput {
    rate: u32,
    speed_code: u64,
}

#[derive(Serialize)]
struct WriteOutput<'a> {
    port: &'a str,
    requested: usize,
    written: usize,
}

pub fn print_chunk(data: &[u8], port: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&ChunkOutput {
            kind: "chunk",
            size: data.len(),
            data: data_preview(data),
            port,
            timestamp: now_unix_seconds(),
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "SIZE", "DATA"])
                .add_row(vec![
                    port.to_string(),
                    data.len().to_string(),
                    data_preview(data),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("size={} data={}", data.len(), data_preview(data));
        }
        OutputFormat::Raw => print_raw(data),
    }
}

pub fn print_line(line: &str, port: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&LineOutput {
            kind: "line",
            line,
            port,
            timestamp: now_unix_seconds(),
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "LINE"])
                .add_row(vec![port, line]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{port}: {line}"),
        OutputFormat::Raw => println!("{line}"),
    }
}

pub fn print_bauds(format: OutputFormat) {
    let rates = BaudRate::ALL.iter().map(|rate| BaudOutput {
        rate: rate.value(),
        speed_code: u64::from(rate.speed()),
    });

    match format {
        OutputFormat::Json => print_json(&rates.collect::<Vec<_>>()),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["RATE", "SPEED CODE"]);
            for rate in rates {
                table.add_row(vec![
                    rate.rate.to_string(),
                    format!("{:#x}", rate.speed_code),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for rate in rates {
                println!("{}", rate.rate);
            }
        }
    }
}

pub fn print_write_report(port: &str, requested: usize, written: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&WriteOutput {
            port,
            requested,
            written,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["PORT", "REQUESTED", "WRITTEN"])
                .add_row(vec![
                    port.to_string(),
                    requested.to_string(),
                    written.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("wrote {written}/{requested} bytes to {port}"),
        OutputFormat::Raw => println!("{written}"),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn data_preview(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", data.len()),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_marks_binary_data() {
        assert_eq!(data_preview(b"ok"), "ok");
        assert_eq!(data_preview(&[0xff, 0xfe]), "<binary 2 bytes>");
    }
}
