mod autosave;
mod bindings;
mod calc;
mod dom;
mod forms;
mod ipc;
mod keys;
mod notify;
mod table;

use std::io::{self, BufRead, Write};

fn main() {
    // stderr only; stdout is the response channel.
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")
        .ok()
        .and_then(|l| l.start().ok());

    let mut state = ipc::AppState {
        page: None,
        transport: Box::new(autosave::HttpTransport::new()),
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id; ignore.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
