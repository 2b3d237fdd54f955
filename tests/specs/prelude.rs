// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fluent helpers for driving the `hw` binary.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

pub fn cli() -> CliBuilder {
    CliBuilder { args: Vec::new(), envs: vec![("NO_COLOR".into(), "1".into())] }
}

pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    fn run(self) -> RunAssert {
        let mut cmd = assert_cmd::Command::cargo_bin("hw").unwrap();
        cmd.args(&self.args).env_remove("HW_CONFIG").env_remove("HW_TOKEN");
        for (k, v) in &self.envs {
            cmd.env(k, v);
        }
        cmd.timeout(std::time::Duration::from_secs(30));
        let output = cmd.output().unwrap();
        RunAssert {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn passes(self) -> RunAssert {
        self.exits(0)
    }

    pub fn exits(self, code: i32) -> RunAssert {
        let run = self.run();
        similar_asserts::assert_eq!(
            run.code,
            Some(code),
            "unexpected exit code\nstdout:\n{}\nstderr:\n{}",
            run.stdout,
            run.stderr
        );
        run
    }
}

pub struct RunAssert {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl RunAssert {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }
}

/// A host that answers every POST to a path with the same canned JSON body.
pub struct FakeHost {
    addr: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl FakeHost {
    pub fn serve(routes: &[(&str, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let routes: HashMap<String, String> =
            routes.iter().map(|(p, b)| (p.to_string(), b.to_string())).collect();
        let hits = Arc::new(Mutex::new(HashMap::new()));
        let counter = Arc::clone(&hits);
        std::thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let mut reader = BufReader::new(stream);
                let path = read_request(&mut reader);
                *counter.lock().unwrap().entry(path.clone()).or_insert(0) += 1;
                let response = match routes.get(&path) {
                    Some(body) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = reader.get_mut().write_all(response.as_bytes());
            }
        });
        Self { addr, hits }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

/// Read one request, returning its path.
fn read_request<R: Read>(reader: &mut BufReader<R>) -> String {
    let mut request_line = String::new();
    let _ = reader.read_line(&mut request_line);
    let path = request_line.split_whitespace().nth(1).unwrap_or("").to_string();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
            break;
        }
        if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = v.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0u8; content_length];
    let _ = reader.read_exact(&mut body);
    path
}

/// An address nothing listens on.
pub fn closed_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().to_string()
}
