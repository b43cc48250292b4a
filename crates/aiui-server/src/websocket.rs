//! WebSocket-based hot reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// WebSocket endpoint clients connect to.
pub const HMR_SOCKET_PATH: &str = "/__hmr";

/// Client script injected into every dev page.
pub const HMR_SCRIPT_PATH: &str = "/__hmr.js";

/// Messages sent to clients for hot reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HmrMessage {
    /// Full page reload
    Reload,

    /// Replace the rendered content of one page
    UpdateContent {
        /// Page path
        path: String,
        /// New article HTML
        html: String,
    },

    /// Connection established
    Connected,
}

/// Messages a lagging client may fall behind by before it misses some.
const BACKLOG: usize = 64;

/// Fan-out of [`HmrMessage`]s to every open socket.
#[derive(Debug, Clone)]
pub struct HmrHub {
    sender: broadcast::Sender<HmrMessage>,
}

impl HmrHub {
    pub fn new() -> Self {
        Self {
            sender: broadcast::channel(BACKLOG).0,
        }
    }

    /// Push `msg` to connected clients, returning how many received it.
    pub fn send(&self, msg: HmrMessage) -> usize {
        let clients = self.sender.send(msg).unwrap_or(0);
        tracing::trace!("HMR message sent to {} client(s)", clients);
        clients
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HmrMessage> {
        self.sender.subscribe()
    }

    /// Open client sockets.
    pub fn clients(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HmrHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Browser side of hot reload.
///
/// The socket URL is built from the page's own host so the script works
/// on any bound address. After the server goes away the client retries
/// with a growing delay and reloads once it is back.
pub fn hmr_client_script(socket_path: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  var url = (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '{}';
  var retries = 0;

  function pagePath() {{
    return location.pathname.replace(/\/+$/, '') || '/';
  }}

  function apply(msg) {{
    if (msg.type === 'reload') {{
      location.reload();
    }} else if (msg.type === 'update_content' && msg.path === pagePath()) {{
      var article = document.querySelector('article.doc');
      if (!article) {{
        location.reload();
        return;
      }}
      article.innerHTML = msg.html;
    }}
  }}

  function connect() {{
    var socket = new WebSocket(url);

    socket.onopen = function() {{
      if (retries > 0) {{
        location.reload();
      }}
    }};
    socket.onmessage = function(event) {{
      apply(JSON.parse(event.data));
    }};
    socket.onclose = function() {{
      if (retries < 10) {{
        retries += 1;
        setTimeout(connect, 500 * retries);
      }}
    }};
  }}

  connect();
}})();
"#,
        socket_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_broadcasts_messages() {
        let hub = HmrHub::new();
        let mut rx = hub.subscribe();

        hub.send(HmrMessage::Reload);

        match rx.try_recv() {
            Ok(HmrMessage::Reload) => {}
            other => panic!("Expected Reload message, got {:?}", other),
        }
    }

    #[test]
    fn send_reports_receiving_clients() {
        let hub = HmrHub::new();
        assert_eq!(hub.clients(), 0);
        assert_eq!(hub.send(HmrMessage::Connected), 0);

        let _rx = hub.subscribe();
        assert_eq!(hub.clients(), 1);
        assert_eq!(hub.send(HmrMessage::Reload), 1);
    }

    #[test]
    fn serializes_messages() {
        let msg = HmrMessage::UpdateContent {
            path: "/docs/intro".to_string(),
            html: "<p>Hi</p>".to_string(),
        };

        let json = serde_json::to_string(&msg).unwrap();

        assert!(json.contains(r#""type":"update_content""#));
        assert!(json.contains("/docs/intro"));
        assert_eq!(serde_json::from_str::<HmrMessage>(&json).unwrap(), msg);
    }

    #[test]
    fn script_connects_to_socket_path() {
        let script = hmr_client_script(HMR_SOCKET_PATH);
        assert!(script.contains("location.host + '/__hmr'"));
        assert!(script.contains("article.doc"));
        assert!(script.contains("update_content"));
    }
}
