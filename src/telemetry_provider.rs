use std::io::BufRead;
use std::sync::mpsc::Sender;

use crate::telemetry_message::TelemetryMessage;


/**
 * Reads recorded telemetry and forwards each sample to the loop that owns
 * the compass state. Should be run in a thread.
 */
pub struct TelemetryProvider<R: BufRead> {
    reader: R,
    telemetry_message_tx: Sender<TelemetryMessage>,
    line_number: usize,
    skipped: usize,
}


impl<R: BufRead> TelemetryProvider<R> {
    pub fn new(reader: R, telemetry_message_tx: Sender<TelemetryMessage>) -> TelemetryProvider<R> {
        TelemetryProvider {
            reader,
            telemetry_message_tx,
            line_number: 0,
            skipped: 0,
        }
    }

    /**
     * Forwards messages until the input ends or the receiver hangs up.
     * Malformed lines are logged and skipped. Returns the number of messages
     * sent.
     */
    pub fn run(&mut self) -> usize {
        let mut sent = 0;
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            match self.reader.read_until(b'\n', &mut buffer) {
                Ok(0) => break,
                Ok(_) => self.line_number += 1,
                Err(e) => {
                    error!("Unable to read telemetry: {}", e);
                    break;
                }
            }

            let line = match std::str::from_utf8(&buffer) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Skipping line {}: {}", self.line_number, e);
                    self.skipped += 1;
                    continue;
                }
            };
            let record = line.trim();
            if record.is_empty() || record.starts_with('#') {
                continue;
            }

            match TelemetryMessage::parse(record) {
                Ok(message) => {
                    if self.telemetry_message_tx.send(message).is_err() {
                        warn!("Telemetry receiver hung up");
                        break;
                    }
                    sent += 1;
                }
                Err(e) => {
                    warn!("Skipping line {}: {}", self.line_number, e);
                    self.skipped += 1;
                }
            }
        }
        info!(
            "Telemetry provider done, {} messages sent, {} lines skipped",
            sent,
            self.skipped);
        sent
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
