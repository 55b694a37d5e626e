use log::debug;

use crate::device::StatusReport;

use super::config::BackendConfig;
use super::error::ClientError;
use super::{Backend, Command, CommandReply};

/// [`Backend`] over JSON/HTTP using a blocking `ureq` client.
///
/// Polls and commands use separate agents: polls are bounded by
/// [`BackendConfig::poll_timeout`], commands only by
/// [`BackendConfig::command_timeout`] when one is set.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: BackendConfig,
    poll_agent: ureq::Agent,
    command_agent: ureq::Agent,
}

impl HttpBackend {
    /// Create a backend client; fails on an invalid configuration
    pub fn new(config: BackendConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let poll_agent = ureq::AgentBuilder::new()
            .timeout(config.poll_timeout)
            .user_agent(&config.user_agent)
            .build();

        let mut command_builder = ureq::AgentBuilder::new().user_agent(&config.user_agent);
        if let Some(timeout) = config.command_timeout {
            command_builder = command_builder.timeout(timeout);
        }
        let command_agent = command_builder.build();

        Ok(Self {
            config,
            poll_agent,
            command_agent,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn read_body(
        response: Result<ureq::Response, ureq::Error>,
    ) -> Result<String, ClientError> {
        match response {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| ClientError::Transport(e.to_string())),
            Err(ureq::Error::Status(status, resp)) => Err(ClientError::Status {
                status,
                message: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(e)) => Err(ClientError::Transport(e.to_string())),
        }
    }
}

impl Backend for HttpBackend {
    fn status(&self) -> Result<StatusReport, ClientError> {
        let url = self.config.url("api/status");
        let body = Self::read_body(
            self.poll_agent
                .get(&url)
                .set("Accept", "application/json")
                .call(),
        )?;
        Ok(StatusReport::from_json(&body)?)
    }

    fn send(&self, command: &Command) -> Result<CommandReply, ClientError> {
        let url = self.config.url(command.path());
        debug!("POST {} {:?}", url, command);

        let request = self
            .command_agent
            .post(&url)
            .set("Accept", "application/json");
        let response = match command.body() {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        let body = Self::read_body(response)?;
        if command.expects_reply() {
            CommandReply::from_body(&body)
        } else {
            Ok(CommandReply::ok())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;
    use crate::client::VoltmeterCommand;

    /// Serve `replies` requests with a fixed plain-text body, one per connection
    fn serve_text(body: &'static str, replies: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming().take(replies) {
                let mut stream = stream.unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut content_length = 0;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                    let lower = line.to_ascii_lowercase();
                    if let Some(value) = lower.strip_prefix("content-length:") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                let mut request_body = vec![0; content_length];
                reader.read_exact(&mut request_body).unwrap();

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_send_ignores_body_without_reply_contract() {
        let url = serve_text("started", 3);
        let backend = HttpBackend::new(BackendConfig::new(url)).unwrap();

        assert_eq!(backend.send(&Command::ConnectVoltmeter).unwrap(), CommandReply::ok());
        assert_eq!(
            backend
                .send(&Command::Voltmeter(VoltmeterCommand::Tare))
                .unwrap(),
            CommandReply::ok()
        );
        assert_eq!(
            backend.send(&Command::TogglePin { pin: 4, on: true }).unwrap(),
            CommandReply::ok()
        );
    }

    #[test]
    fn test_send_decodes_contract_replies() {
        let url = serve_text("started", 1);
        let backend = HttpBackend::new(BackendConfig::new(url)).unwrap();
        assert!(matches!(
            backend.send(&Command::ConnectResistanceBox),
            Err(ClientError::Decode(_))
        ));
    }
}
