use mime_guess::from_path;
use std::io::Write;
use std::net::TcpStream;

use super::path_utils::{is_within_root, resolve_request_path, ResolvedPath};
use super::*;

pub fn serve_file(base_dir: &Path, request_target: &str) -> ServeOutcome {
    log::debug!("Received request for path: {}", request_target);
    log::trace!("Base directory: {}", base_dir.display());

    let path = match resolve_request_path(base_dir, request_target) {
        ResolvedPath::Within(p) => p,
        ResolvedPath::Escapes => return ServeOutcome::Forbidden,
        // No file can carry a name that does not decode
        ResolvedPath::Undecodable => {
            return ServeOutcome::NotFound(display_path(request_target))
        }
    };

    let final_path = if path.is_dir() {
        path.join("index.html")
    } else {
        path
    };
    log::debug!("Final resolved path: {}", final_path.display());

    match is_within_root(base_dir, &final_path) {
        Ok(true) => {}
        Ok(false) => {
            log::warn!("Path escapes base directory: {}", final_path.display());
            return ServeOutcome::Forbidden;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return ServeOutcome::NotFound(display_path(request_target));
        }
        Err(e) => return ServeOutcome::Failed(e),
    }

    let read = final_path.as_path().log_operation("read", || fs::read(&final_path));
    match read {
        Ok(content) => {
            let mime_type = from_path(&final_path).first_or_octet_stream().to_string();
            ServeOutcome::Found(ServedFile {
                path: final_path,
                content,
                mime_type,
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            ServeOutcome::NotFound(display_path(request_target))
        }
        Err(e) => ServeOutcome::Failed(e),
    }
}

fn display_path(request_target: &str) -> String {
    let path = request_target.split(['?', '#']).next().unwrap_or("/");
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn not_found_page(request_path: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>404 - Not Found</title></head>\n\
         <body>\n\
         <h1>404 - Page Not Found</h1>\n\
         <p>The requested file \"{}\" was not found.</p>\n\
         </body>\n\
         </html>\n",
        escape_html(request_path)
    )
}

fn write_response<W: Write>(
    client: &mut W,
    status: &str,
    content_type: &str,
    body: &[u8],
) -> io::Result<()> {
    client.write_all(format!("HTTP/1.1 {}\r\n", status).as_bytes())?;
    client.write_all(format!("Content-Type: {}\r\n", content_type).as_bytes())?;
    client.write_all(format!("Content-Length: {}\r\n", body.len()).as_bytes())?;
    client.write_all(b"Connection: close\r\n")?;
    client.write_all(b"\r\n")?;
    client.write_all(body)?;
    client.flush()
}

/// Answers one request. Returns the status line and body size for logging.
pub fn respond<W: Write>(
    client: &mut W,
    base_dir: &Path,
    request_line: &str,
) -> io::Result<(&'static str, usize)> {
    let request_target = request_line.split_whitespace().nth(1).unwrap_or("/");

    let (status, content_type, body) = match serve_file(base_dir, request_target) {
        ServeOutcome::Found(file) => ("200 OK", file.mime_type, file.content),
        ServeOutcome::Forbidden => (
            "403 Forbidden",
            "text/plain".to_string(),
            b"Forbidden".to_vec(),
        ),
        ServeOutcome::NotFound(path) => (
            "404 Not Found",
            "text/html".to_string(),
            not_found_page(&path).into_bytes(),
        ),
        ServeOutcome::Failed(e) => {
            crate::log_error!(e, format!("Failed to serve {}", request_target));
            (
                "500 Internal Server Error",
                "text/plain".to_string(),
                b"Internal Server Error".to_vec(),
            )
        }
    };

    write_response(client, status, &content_type, &body)?;
    Ok((status, body.len()))
}

/// Answers a request line that could not be parsed.
pub fn bad_request<W: Write>(client: &mut W) -> io::Result<(&'static str, usize)> {
    let status = "400 Bad Request";
    let body = b"Bad Request";
    write_response(client, status, "text/plain", body)?;
    Ok((status, body.len()))
}

pub fn handle_file_request(
    mut client: TcpStream,
    base_dir: &Path,
    request_line: &str,
) -> io::Result<(&'static str, usize)> {
    respond(&mut client, base_dir, request_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn docs() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<h1>cards</h1>").unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img").join("1_md.PNG"), [0x89, b'P', b'N', b'G']).unwrap();
        fs::write(dir.path().join("blob.zzqx"), "raw").unwrap();
        dir
    }

    fn response_text(base: &Path, request_line: &str) -> String {
        let mut out = Vec::new();
        respond(&mut out, base, request_line).unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    #[test]
    fn root_serves_index() {
        let dir = docs();
        let root = serve_file(dir.path(), "/");
        let index = serve_file(dir.path(), "/index.html");
        match (root, index) {
            (ServeOutcome::Found(a), ServeOutcome::Found(b)) => {
                assert_eq!(a.content, b.content);
                assert_eq!(a.mime_type, "text/html");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn directory_serves_its_index() {
        let dir = docs();
        fs::write(dir.path().join("img").join("index.html"), "gallery").unwrap();
        match serve_file(dir.path(), "/img/") {
            ServeOutcome::Found(file) => assert_eq!(file.content, b"gallery"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn mime_types_follow_extension() {
        let dir = docs();
        match serve_file(dir.path(), "/img/1_md.PNG") {
            ServeOutcome::Found(file) => assert_eq!(file.mime_type, "image/png"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        match serve_file(dir.path(), "/blob.zzqx") {
            ServeOutcome::Found(file) => assert_eq!(file.mime_type, "application/octet-stream"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_not_found_with_path() {
        let dir = docs();
        match serve_file(dir.path(), "/missing.html?x=1") {
            ServeOutcome::NotFound(path) => assert_eq!(path, "/missing.html"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn traversal_is_forbidden() {
        let dir = docs();
        assert!(matches!(
            serve_file(dir.path(), "/../../etc/passwd"),
            ServeOutcome::Forbidden
        ));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_out_of_root_is_forbidden() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), "key").unwrap();
        let dir = docs();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            dir.path().join("leak.txt"),
        )
        .unwrap();

        assert!(matches!(
            serve_file(dir.path(), "/leak.txt"),
            ServeOutcome::Forbidden
        ));
    }

    #[test]
    fn writes_status_headers_and_body() {
        let dir = docs();
        let text = response_text(dir.path(), "GET /index.html HTTP/1.1");
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/html\r\n"));
        assert!(text.contains("Content-Length: 14\r\n"));
        assert!(text.ends_with("\r\n\r\n<h1>cards</h1>"));
    }

    #[test]
    fn error_responses() {
        let dir = docs();

        let text = response_text(dir.path(), "GET /../secret HTTP/1.1");
        assert!(text.starts_with("HTTP/1.1 403 Forbidden\r\n"));
        assert!(text.ends_with("Forbidden"));

        let text = response_text(dir.path(), "GET /nope/<b>.html HTTP/1.1");
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Content-Type: text/html\r\n"));
        assert!(text.contains("The requested file \"/nope/&lt;b&gt;.html\" was not found."));
    }

    #[test]
    fn bad_request_is_plain_text() {
        let mut out = Vec::new();
        let (status, size) = bad_request(&mut out).unwrap();
        assert_eq!((status, size), ("400 Bad Request", 11));
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(text.ends_with("\r\n\r\nBad Request"));
    }

    #[test]
    fn undecodable_target_is_not_found() {
        let dir = docs();
        assert!(matches!(
            serve_file(dir.path(), "/%ff"),
            ServeOutcome::NotFound(_)
        ));

        let text = response_text(dir.path(), "GET /%ff HTTP/1.1");
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Content-Type: text/html\r\n"));
    }
}
