use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const SAMPLE_CSV: &str = "\
Country,Region,Total Cases,Total Deaths
USA,Americas,\"94,152,573\",\"1,040,506\"
India,Asia,44516479,528250
Brazil,Americas,34544377,685002
France,Europe,35342950,154027
";

#[derive(Debug, Deserialize)]
struct SceneDescriptor {
    id: String,
    title: String,
    interactive: bool,
}

#[derive(Debug, Deserialize)]
struct SceneResponse {
    id: String,
    title: String,
    subtitle: String,
    svg: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    records: usize,
    regions: usize,
    total_cases: u64,
    total_deaths: u64,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "covid_scenes_http_{}_{}.csv",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        // The scene list is served whether or not the dataset loaded.
        if let Ok(resp) = client.get(format!("{base_url}/api/scenes")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(data_path: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_covid_scenes"))
        .env("PORT", port.to_string())
        .env("COVID_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let data_path = unique_data_path();
    std::fs::write(&data_path, SAMPLE_CSV).expect("write sample csv");
    let server = Arc::new(spawn_server(&data_path).await);
    *guard = Some(Arc::clone(&server));
    server
}

#[tokio::test]
async fn http_index_serves_the_page() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"id="visualization""#));
    assert!(body.contains(r#"id="scene-nav""#));
}

#[tokio::test]
async fn http_scene_list_matches_narrative_order() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let scenes: Vec<SceneDescriptor> = client
        .get(format!("{}/api/scenes", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let ids: Vec<&str> = scenes.iter().map(|scene| scene.id.as_str()).collect();
    assert_eq!(
        ids,
        [
            "top-cases",
            "top-deaths",
            "cases-by-region",
            "deaths-by-region",
            "explore"
        ]
    );
    assert!(scenes.iter().all(|scene| !scene.title.is_empty()));
    assert!(scenes.last().unwrap().interactive);
}

#[tokio::test]
async fn http_top_cases_scene_renders_sorted_bars() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let scene: SceneResponse = client
        .get(format!("{}/api/scene/top-cases", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(scene.id, "top-cases");
    assert_eq!(scene.title, "Hardest-hit countries");
    assert!(!scene.subtitle.is_empty());
    assert_eq!(scene.svg.matches("<svg").count(), 1);
    // One bar per sample country.
    assert_eq!(scene.svg.matches(r#"class="bar""#).count(), 4);
    // Annotation re-derived from the data points at the USA.
    assert!(scene.svg.contains("Highest: USA"));
}

#[tokio::test]
async fn http_region_scene_covers_every_region() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let scene: SceneResponse = client
        .get(format!("{}/api/scene/cases-by-region", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(scene.svg.matches(r#"class="bar""#).count(), 3);
    for region in ["Americas", "Asia", "Europe"] {
        assert!(scene.svg.contains(region), "missing {region}");
    }
}

#[tokio::test]
async fn http_explore_scene_embeds_tooltips() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let scene: SceneResponse = client
        .get(format!("{}/api/scene/explore", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(scene
        .svg
        .contains(r#"data-tip="Cases: 94,152,573, Deaths: 1,040,506""#));
}

#[tokio::test]
async fn http_unknown_scene_is_404() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/scene/no-such-scene", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn http_summary_totals_match_sample() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let summary: SummaryResponse = client
        .get(format!("{}/api/summary", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary.records, 4);
    assert_eq!(summary.regions, 3);
    assert_eq!(
        summary.total_cases,
        94_152_573 + 44_516_479 + 34_544_377 + 35_342_950
    );
    assert_eq!(
        summary.total_deaths,
        1_040_506 + 528_250 + 685_002 + 154_027
    );
}

#[tokio::test]
async fn http_missing_dataset_is_a_guarded_no_op() {
    let _guard = TEST_LOCK.lock().await;
    // Point the server at a file that does not exist; it must still serve,
    // and scenes must answer with a diagnostic instead of rendering.
    let server = spawn_server(&unique_data_path()).await;
    let client = Client::new();

    let scenes = client
        .get(format!("{}/api/scenes", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(scenes.status().is_success());

    let response = client
        .get(format!("{}/api/scene/top-cases", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 503);
    let body = response.text().await.unwrap();
    assert!(body.contains("dataset not loaded"));

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Dataset could not be loaded"));
}
