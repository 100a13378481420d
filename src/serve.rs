//! Development mode: watch the inputs, rebuild, serve the output.
//!
//! `serve` runs a full build, then keeps two loops alive: a filesystem
//! watcher that triggers a complete rebuild on any content or static change,
//! and a small blocking HTTP server over the output directory. Rebuilds are
//! whole-site and synchronous, one per filesystem event; with a warm
//! thumbnail cache a rebuild is fast enough that debouncing buys nothing.
//!
//! Both input trees are watched recursively; events whose paths all lie
//! under `static/thumbs/` are the build's own writes and are filtered out so
//! thumbnail generation never feeds back into the watcher.
//!
//! The server is deliberately minimal: GET-style path resolution against the
//! output tree, a `Content-Type` from the file extension, `index.html` for
//! directory paths, 404 otherwise. It exists for local preview, not
//! production; the output directory is designed to be uploaded to any static
//! host.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use notify::{Event, EventKind, RecursiveMode, Watcher};
use thiserror::Error;
use tiny_http::{Header, Response, Server};

use crate::build::{self, SitePaths};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        source: notify::Error,
    },
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Build, then watch and serve until interrupted. Does not return normally.
pub fn run(paths: SitePaths, port: u16) -> Result<(), ServeError> {
    // A broken initial state should not kill the dev loop; the next saved
    // edit triggers a fresh attempt.
    if let Err(e) = build::build(&paths) {
        eprintln!("Build failed: {e}");
    }

    let addr = format!("0.0.0.0:{port}");
    let server = Server::http(&addr).map_err(|source| ServeError::Bind {
        addr: addr.clone(),
        source,
    })?;
    println!("Serving {} on http://{addr}", paths.output.display());

    let output = paths.output.clone();
    thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = respond(&output, request.url());
            let _ = request.respond(response);
        }
    });

    watch_and_rebuild(&paths)
}

/// Blocking watch loop: one full rebuild per relevant filesystem event.
fn watch_and_rebuild(paths: &SitePaths) -> Result<(), ServeError> {
    let (tx, rx) = mpsc::channel();
    let mut watcher =
        notify::recommended_watcher(tx).map_err(|source| ServeError::Watch {
            path: paths.content.clone(),
            source,
        })?;

    watcher
        .watch(&paths.content, RecursiveMode::Recursive)
        .map_err(|source| ServeError::Watch {
            path: paths.content.clone(),
            source,
        })?;
    watcher
        .watch(&paths.static_dir, RecursiveMode::Recursive)
        .map_err(|source| ServeError::Watch {
            path: paths.static_dir.clone(),
            source,
        })?;
    println!(
        "Watching {} and {}",
        paths.content.display(),
        paths.static_dir.display()
    );

    for result in rx {
        match result {
            Ok(event) if should_rebuild(&event) => {
                println!("Change detected, rebuilding");
                if let Err(e) = build::build(paths) {
                    eprintln!("Rebuild failed: {e}");
                }
            }
            Ok(_) => {}
            Err(e) => eprintln!("Watch error: {e}"),
        }
    }
    Ok(())
}

/// Only content-bearing events trigger a rebuild; access and metadata noise
/// does not. Paths under a `thumbs` directory are the build's own writes.
fn should_rebuild(event: &Event) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    let only_thumbs = !event.paths.is_empty()
        && event
            .paths
            .iter()
            .all(|p| p.components().any(|c| c.as_os_str() == "thumbs"));
    relevant_kind && !only_thumbs
}

// ============================================================================
// Request handling
// ============================================================================

fn respond(output: &Path, url: &str) -> Response<Box<dyn std::io::Read + Send>> {
    match resolve(output, url) {
        Some(path) if path.is_file() => match fs::File::open(&path) {
            Ok(file) => {
                let header = Header::from_bytes(
                    &b"Content-Type"[..],
                    content_type(&path).as_bytes(),
                )
                .expect("static header bytes are valid");
                Response::from_file(file).with_header(header).boxed()
            }
            Err(e) => {
                eprintln!("Failed to open {}: {e}", path.display());
                not_found()
            }
        },
        _ => not_found(),
    }
}

fn not_found() -> Response<Box<dyn std::io::Read + Send>> {
    Response::from_string("404 Not Found")
        .with_status_code(404)
        .boxed()
}

/// Map a request URL onto a file inside the output tree.
///
/// Directory paths (including "/") get `index.html` appended. Any path that
/// would escape the output root resolves to `None`.
fn resolve(output: &Path, url: &str) -> Option<PathBuf> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let rel = if path.ends_with('/') {
        format!("{path}index.html")
    } else {
        path.to_string()
    };

    let mut target = output.to_path_buf();
    for component in Path::new(rel.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => target.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    // A directory requested without the trailing slash still gets its index
    if target.is_dir() {
        target.push("index.html");
    }
    Some(target)
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("gpx") => "application/gpx+xml",
        Some("txt") => "text/plain; charset=utf-8",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
