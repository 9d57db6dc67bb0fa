use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, params};

#[derive(Debug, Clone)]
pub(crate) enum Behavior {
    Respond(u16, Vec<u8>),
    DelayRespond(Duration, u16, Vec<u8>),
}

#[derive(Debug)]
pub(crate) struct TestServer {
    pub(crate) base_url: String,
    requests: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<String>>>,
    shutdown_tx: mpsc::Sender<()>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl TestServer {
    pub(crate) fn spawn(behaviors: Vec<Behavior>) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind test server");
        listener.set_nonblocking(true).expect("set nonblocking");
        let addr = listener.local_addr().expect("local addr");

        let requests = Arc::new(AtomicUsize::new(0));
        let requests_clone = Arc::clone(&requests);
        let paths = Arc::new(Mutex::new(Vec::new()));
        let paths_clone = Arc::clone(&paths);
        let shared_behaviors = Arc::new(Mutex::new(VecDeque::from(behaviors)));
        let behaviors_clone = Arc::clone(&shared_behaviors);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                match listener.accept() {
                    Ok((mut stream, _)) => {
                        requests_clone.fetch_add(1, Ordering::SeqCst);
                        let behavior = {
                            let mut queue = behaviors_clone.lock().expect("lock behaviors");
                            queue.pop_front().unwrap_or_else(|| {
                                Behavior::Respond(200, b"default-ok".to_vec())
                            })
                        };
                        let paths = Arc::clone(&paths_clone);
                        std::thread::spawn(move || {
                            if let Ok(Some(path)) = consume_request(&mut stream) {
                                paths.lock().expect("lock paths").push(path);
                            }
                            serve_behavior(&mut stream, behavior);
                        });
                    }
                    Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            paths,
            shutdown_tx,
            join_handle: Some(join_handle),
        }
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub(crate) fn requested_paths(&self) -> Vec<String> {
        self.paths.lock().expect("lock paths").clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

fn consume_request(stream: &mut TcpStream) -> std::io::Result<Option<String>> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(Duration::from_millis(200)))?;
    let mut buf = [0_u8; 1024];
    let mut data = Vec::new();
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => {
                data.extend_from_slice(&buf[..read]);
                if data.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }
            Err(err)
                if err.kind() == std::io::ErrorKind::WouldBlock
                    || err.kind() == std::io::ErrorKind::TimedOut =>
            {
                break;
            }
            Err(err) => return Err(err),
        }
    }

    let head = String::from_utf8_lossy(&data);
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .map(str::to_string);
    Ok(path)
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

fn serve_behavior(stream: &mut TcpStream, behavior: Behavior) {
    match behavior {
        Behavior::Respond(status, body) => {
            let _ = write_response(stream, status, &body);
        }
        Behavior::DelayRespond(delay, status, body) => {
            std::thread::sleep(delay);
            let _ = write_response(stream, status, &body);
        }
    }
}

fn write_response(stream: &mut TcpStream, status: u16, payload: &[u8]) -> std::io::Result<()> {
    let reason = reason_phrase(status);
    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        payload.len()
    )?;
    stream.write_all(payload)?;
    stream.flush()
}

pub(crate) fn unique_temp_dir(label: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "trakt-progress-{label}-{}-{ts}-{n}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub(crate) struct SeriesRow<'a> {
    pub(crate) name: &'a str,
    pub(crate) year: Option<i64>,
    pub(crate) genre: Option<&'a str>,
    pub(crate) imdb_id: Option<&'a str>,
    pub(crate) progress: &'a str,
    pub(crate) seasons: &'a str,
}

pub(crate) fn write_snapshot_db(path: &std::path::Path, rows: &[SeriesRow<'_>]) {
    let conn = Connection::open(path).expect("create snapshot db");
    conn.execute_batch(
        r#"
        CREATE TABLE tbl_Trakt (
            NAAM TEXT,
            YEAR INTEGER,
            PLOT TEXT,
            GENRE TEXT,
            IMDB_ID TEXT,
            PROGRESS TEXT,
            SEASONSEPISODES TEXT,
            VIEWSTATUS TEXT,
            RATING REAL,
            UPDATED TEXT
        );
        "#,
    )
    .expect("create table");
    for row in rows {
        conn.execute(
            r#"
            INSERT INTO tbl_Trakt
                (NAAM, YEAR, PLOT, GENRE, IMDB_ID, PROGRESS, SEASONSEPISODES, VIEWSTATUS, RATING, UPDATED)
            VALUES (?1, ?2, NULL, ?3, ?4, ?5, ?6, 'Bezig', 8.5, '01-02-2024 10:00:00')
            "#,
            params![
                row.name,
                row.year,
                row.genre,
                row.imdb_id,
                row.progress,
                row.seasons
            ],
        )
        .expect("insert row");
    }
}
