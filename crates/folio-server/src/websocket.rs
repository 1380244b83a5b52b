//! WebSocket-based live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// WebSocket endpoint of the reload channel.
pub const RELOAD_SOCKET_PATH: &str = "/__folio/ws";

/// URL of the client script injected into dev builds.
pub const RELOAD_SCRIPT_PATH: &str = "/__folio/reload.js";

/// Messages sent to connected browsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// Connection established
    Connected,

    /// A rebuild succeeded, reload the page
    Reload,

    /// A rebuild failed; the previous output is still served
    Error {
        /// Build error as reported in the terminal
        message: String,
    },
}

/// Hub for broadcasting reload messages to all connected clients.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    /// Create a new reload hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: ReloadMessage) {
        // No receivers just means no open tabs
        let _ = self.sender.send(msg);
    }

    /// Subscribe to reload messages.
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the client-side reload script.
///
/// The socket URL is derived from the page location so the script works
/// behind any host name or port.
pub fn reload_client_script(socket_path: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const url = (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '{}';
  let overlay = null;

  function showError(message) {{
    if (!overlay) {{
      overlay = document.createElement('div');
      overlay.id = 'folio-error-overlay';
      overlay.style.cssText = 'position:fixed;inset:0;z-index:9999;padding:2rem;overflow:auto;' +
        'background:rgba(0,0,0,0.85);color:#ff6b6b;font:14px/1.6 ui-monospace,monospace;white-space:pre-wrap';
      overlay.addEventListener('click', function() {{ overlay.remove(); overlay = null; }});
      document.body.appendChild(overlay);
    }}
    overlay.textContent = '[folio] Build failed\n\n' + message;
  }}

  function connect(attempt) {{
    const ws = new WebSocket(url);

    ws.onopen = function() {{
      if (attempt > 0) {{
        location.reload();
      }}
    }};

    ws.onmessage = function(event) {{
      const msg = JSON.parse(event.data);

      switch (msg.type) {{
        case 'reload':
          location.reload();
          break;

        case 'error':
          console.error('[folio]', msg.message);
          showError(msg.message);
          break;

        case 'connected':
          console.log('[folio] Live reload connected');
          break;
      }}
    }};

    ws.onclose = function() {{
      if (attempt < 10) {{
        setTimeout(function() {{ connect(attempt + 1); }}, 1000 * (attempt + 1));
      }}
    }};
  }}

  connect(0);
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
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        hub.send(ReloadMessage::Reload);

        match rx.try_recv() {
            Ok(ReloadMessage::Reload) => {}
            other => panic!("Expected Reload message, got {:?}", other),
        }
    }

    #[test]
    fn send_without_clients_is_fine() {
        let hub = ReloadHub::new();
        assert_eq!(hub.subscriber_count(), 0);
        hub.send(ReloadMessage::Reload);
    }

    #[test]
    fn serializes_messages() {
        let reload = serde_json::to_string(&ReloadMessage::Reload).unwrap();
        assert_eq!(reload, r#"{"type":"reload"}"#);

        let error = serde_json::to_string(&ReloadMessage::Error {
            message: "Found 1 dead link(s)".to_string(),
        })
        .unwrap();
        assert_eq!(error, r#"{"type":"error","message":"Found 1 dead link(s)"}"#);
    }

    #[test]
    fn script_targets_socket_path() {
        let script = reload_client_script(RELOAD_SOCKET_PATH);
        assert!(script.contains("location.host + '/__folio/ws'"));
        assert!(script.contains("case 'error'"));
    }
}
