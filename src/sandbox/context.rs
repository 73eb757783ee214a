use super::telemetry::TelemetrySender;
use super::{ContextFactory, SandboxPolicy};
use crate::compose::instrument::js_string;
use crate::constants::{MAX_TELEMETRY_BYTES, PREVIEW_BIND_ADDR, TELEMETRY_PATH, TELEMETRY_SOURCE};
use crate::error::SandboxError;
use std::fs;
use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tempfile::TempDir;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

const HOST_PAGE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>pagesmith preview</title>
<style>
  html, body { margin: 0; height: 100%; font-family: sans-serif; }
  body { display: flex; flex-direction: column; }
  iframe { flex: 1; border: 0; }
  #console { height: 25%; overflow: auto; margin: 0; padding: 4px 8px; background: #111; color: #ddd; font: 12px monospace; }
  .error { color: #f87171; } .warn { color: #fbbf24; } .info { color: #60a5fa; }
</style>
</head>
<body>
<iframe id="preview" title="preview" sandbox="__SANDBOX__" src="document.html"></iframe>
<pre id="console"></pre>
<script>
  var frame = document.getElementById("preview");
  var output = document.getElementById("console");
  window.addEventListener("message", function (event) {
    if (event.source !== frame.contentWindow) { return; }
    var data = event.data;
    if (!data || data.source !== __SOURCE__) { return; }
    var line = document.createElement("div");
    line.className = data.type;
    line.textContent = "[" + data.type + "] " + data.message;
    output.appendChild(line);
    output.scrollTop = output.scrollHeight;
    fetch(__RELAY__, { method: "POST", body: JSON.stringify(data) }).catch(function () {});
  });
</script>
</body>
</html>
"#;

/// a preview served from a private temporary directory
///
/// a localhost server hands out `index.html`, which hosts the composed
/// document in a sandboxed iframe, and relays the page's telemetry posts to
/// the host. dropping the context stops the server and removes the directory.
pub struct TempDirContext {
    dir: TempDir,
    generation: u64,
    addr: SocketAddr,
    server: Arc<Server>,
    worker: Option<JoinHandle<()>>,
}

impl TempDirContext {
    /// the page to open in a browser
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn entry_point(&self) -> PathBuf {
        self.dir.path().join("index.html")
    }

    pub fn document_path(&self) -> PathBuf {
        self.dir.path().join("document.html")
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for TempDirContext {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// creates [`TempDirContext`]s, optionally under a fixed parent directory
#[derive(Debug, Default)]
pub struct TempDirFactory {
    parent: Option<PathBuf>,
}

impl TempDirFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(parent: &Path) -> Self {
        Self {
            parent: Some(parent.to_path_buf()),
        }
    }
}

impl ContextFactory for TempDirFactory {
    type Context = TempDirContext;

    fn create(
        &mut self,
        document: &str,
        policy: &SandboxPolicy,
        telemetry: TelemetrySender,
    ) -> Result<TempDirContext, SandboxError> {
        let failed = |e: &dyn std::fmt::Display| SandboxError::ConstructionFailed(e.to_string());

        let mut builder = tempfile::Builder::new();
        builder.prefix("pagesmith-");
        let dir = match &self.parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| failed(&e))?;

        let host = HOST_PAGE
            .replace("__SANDBOX__", &policy.attribute())
            .replace("__SOURCE__", &js_string(TELEMETRY_SOURCE))
            .replace("__RELAY__", &js_string(TELEMETRY_PATH));
        fs::write(dir.path().join("index.html"), host).map_err(|e| failed(&e))?;
        fs::write(dir.path().join("document.html"), document).map_err(|e| failed(&e))?;

        let server = Server::http(PREVIEW_BIND_ADDR).map_err(|e| failed(&e))?;
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| SandboxError::ConstructionFailed("server has no ip address".into()))?;
        let server = Arc::new(server);

        let generation = telemetry.generation();
        let root = dir.path().to_path_buf();
        let worker = thread::Builder::new()
            .name(format!("preview-{generation}"))
            .spawn({
                let server = Arc::clone(&server);
                move || serve(&server, &root, &telemetry)
            })
            .map_err(|e| failed(&e))?;

        Ok(TempDirContext {
            dir,
            generation,
            addr,
            server,
            worker: Some(worker),
        })
    }
}

/// request loop; ends when the server is unblocked
fn serve(server: &Server, root: &Path, telemetry: &TelemetrySender) {
    for request in server.incoming_requests() {
        let _ = handle_request(request, root, telemetry);
    }
}

fn handle_request(
    mut request: Request,
    root: &Path,
    telemetry: &TelemetrySender,
) -> std::io::Result<()> {
    if *request.method() == Method::Post && request.url() == TELEMETRY_PATH {
        let mut payload = String::new();
        request
            .as_reader()
            .take(MAX_TELEMETRY_BYTES)
            .read_to_string(&mut payload)?;
        telemetry.post_json(&payload);
        return request.respond(Response::empty(StatusCode(204)));
    }

    let file = match request.url() {
        "/" | "/index.html" => Some("index.html"),
        "/document.html" => Some("document.html"),
        _ => None,
    };
    let Some(file) = file else {
        return request.respond(Response::from_string("not found").with_status_code(StatusCode(404)));
    };
    let body = fs::read(root.join(file))?;
    let mut response = Response::from_data(body);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]) {
        response = response.with_header(header);
    }
    request.respond(response)
}
