use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// A record the CLI prints: serialised as one JSON line, or as named
/// columns for the human formats.
pub trait Record: Serialize {
    fn columns(&self) -> Vec<(&'static str, String)>;
}

#[derive(Serialize)]
pub struct OperationOutput {
    pub operation: &'static str,
    pub socket: String,
    pub ok: bool,
    pub role: &'static str,
}

impl Record for OperationOutput {
    fn columns(&self) -> Vec<(&'static str, String)> {
        vec![
            ("OPERATION", self.operation.to_string()),
            ("SOCKET", self.socket.clone()),
            ("OK", self.ok.to_string()),
            ("ROLE", self.role.to_string()),
        ]
    }
}

#[derive(Serialize)]
pub struct RoleOutput {
    pub role: &'static str,
    pub socket: String,
    pub timestamp: String,
}

impl Record for RoleOutput {
    fn columns(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ROLE", self.role.to_string()),
            ("SOCKET", self.socket.clone()),
            ("TIMESTAMP", self.timestamp.clone()),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct FrameOutput {
    pub header: u8,
    pub iid: u8,
    pub tid: u8,
    pub command: &'static str,
    pub command_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<u32>,
    pub payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Record for FrameOutput {
    fn columns(&self) -> Vec<(&'static str, String)> {
        let mut columns = vec![
            ("IID", self.iid.to_string()),
            ("TID", self.tid.to_string()),
            ("COMMAND", self.command.to_string()),
        ];
        if let Some(key) = self.key {
            columns.push(("KEY", key.to_string()));
        }
        columns.push(("PAYLOAD", self.payload.clone()));
        if let Some(value) = &self.value {
            columns.push(("VALUE", value.clone()));
        }
        columns
    }
}

pub fn print_record<R: Record>(record: &R, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let (header, row): (Vec<_>, Vec<_>) = record.columns().into_iter().unzip();
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(header)
                .add_row(row);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let line = record
                .columns()
                .into_iter()
                .map(|(name, value)| format!("{}={value}", name.to_ascii_lowercase()))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{line}");
        }
    }
}

pub fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_output_omits_absent_key() {
        let out = FrameOutput {
            header: 0x81,
            iid: 0,
            tid: 1,
            command: "NET_CLEAR",
            command_id: 10,
            key: None,
            key_id: None,
            payload: String::new(),
            value: None,
        };
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("key").is_none());
        assert_eq!(json["command"], "NET_CLEAR");
        assert_eq!(out.columns().len(), 4);
    }
}
