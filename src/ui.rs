pub fn render_index(loaded: bool, source: &str) -> String {
    let status = if loaded {
        String::new()
    } else {
        format!("Dataset could not be loaded from {source}. Scenes are skipped.")
    };
    INDEX_HTML
        .replace("{{STATUS}}", &status)
        .replace("{{SOURCE}}", source)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>COVID-19 — A Story in Five Charts</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef3f8;
      --bg-2: #cfdeed;
      --ink: #22303c;
      --accent: #e2725b;
      --accent-2: #2f4858;
      --bar: #4682b4;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e7eef6 60%, #f2f6fa 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1040px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5b6672;
      font-size: 1rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b919a;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .scene-nav {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
    }

    .scene-btn {
      appearance: none;
      border: none;
      background: transparent;
      border-radius: 999px;
      padding: 10px 16px;
      font-size: 0.9rem;
      font-weight: 600;
      color: #6b7480;
      cursor: pointer;
    }

    .scene-btn.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    .scene-btn.hidden {
      display: none;
    }

    .scene-header h2 {
      margin: 0;
      font-size: 1.4rem;
    }

    .scene-header .subtitle {
      margin-top: 6px;
      font-size: 0.95rem;
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    #visualization {
      width: 100%;
      height: 480px;
    }

    #visualization svg {
      width: 100%;
      height: 100%;
      display: block;
    }

    #visualization text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .bar {
      fill: var(--bar);
    }

    .bar.hovered {
      fill: var(--accent);
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-axis {
      stroke: rgba(47, 72, 88, 0.35);
    }

    .chart-label {
      fill: #7a828c;
      font-size: 11px;
    }

    .chart-title {
      fill: var(--accent-2);
      font-size: 12px;
      font-weight: 600;
    }

    .annotation line {
      stroke: var(--accent);
      stroke-width: 1.5;
    }

    .annotation text {
      fill: var(--accent);
      font-size: 12px;
      font-weight: 600;
    }

    #tooltip {
      fill: var(--ink);
      font-size: 12px;
      font-weight: 600;
    }

    .status {
      font-size: 0.95rem;
      color: #6b7480;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .hint {
      margin: 0;
      color: #6f7681;
      font-size: 0.9rem;
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
      #visualization {
        height: 320px;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>COVID-19 — A Story in Five Charts</h1>
      <p class="subtitle">From the hardest-hit countries to the regional picture, one scene at a time.</p>
    </header>

    <section class="panel">
      <div class="stat">
        <span class="label">Countries</span>
        <span id="stat-records" class="value">--</span>
      </div>
      <div class="stat">
        <span class="label">Regions</span>
        <span id="stat-regions" class="value">--</span>
      </div>
      <div class="stat">
        <span class="label">Total cases</span>
        <span id="stat-cases" class="value">--</span>
      </div>
      <div class="stat">
        <span class="label">Total deaths</span>
        <span id="stat-deaths" class="value">--</span>
      </div>
    </section>

    <nav class="scene-nav" id="scene-nav" role="tablist"></nav>

    <section class="scene-header">
      <h2 id="scene-title">&nbsp;</h2>
      <p id="scene-subtitle" class="subtitle"></p>
    </section>

    <div class="chart-card">
      <div id="visualization"></div>
    </div>

    <div class="status" id="status">{{STATUS}}</div>
    <p class="hint">Data source: {{SOURCE}}. Buttons unlock as the story advances.</p>
  </main>

  <script>
    const nav = document.getElementById('scene-nav');
    const container = document.getElementById('visualization');
    const titleEl = document.getElementById('scene-title');
    const subtitleEl = document.getElementById('scene-subtitle');
    const statusEl = document.getElementById('status');

    let scenes = [];
    let revealed = 1;
    let activeId = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const compact = (value) => {
      if (value >= 1e9) return (value / 1e9).toFixed(1) + 'B';
      if (value >= 1e6) return (value / 1e6).toFixed(1) + 'M';
      if (value >= 1e3) return (value / 1e3).toFixed(1) + 'K';
      return String(value);
    };

    // Tooltip state machine: each bar is idle or hovered; enter and leave are
    // symmetric and at most one tooltip node exists at a time.
    const removeTooltip = (svg) => {
      const old = svg.querySelector('#tooltip');
      if (old) {
        old.remove();
      }
    };

    const wireTooltips = () => {
      const svg = container.querySelector('svg');
      if (!svg) {
        return;
      }
      svg.querySelectorAll('.bar[data-tip]').forEach((bar) => {
        bar.addEventListener('pointerenter', () => {
          bar.classList.add('hovered');
          removeTooltip(svg);
          const box = bar.getBBox();
          const label = document.createElementNS('http://www.w3.org/2000/svg', 'text');
          label.setAttribute('id', 'tooltip');
          label.setAttribute('x', Math.max(box.x - 40, 8));
          label.setAttribute('y', Math.max(box.y - 10, 14));
          label.textContent = bar.dataset.tip;
          svg.appendChild(label);
        });
        bar.addEventListener('pointerleave', () => {
          bar.classList.remove('hovered');
          removeTooltip(svg);
        });
      });
    };

    const renderNav = () => {
      nav.innerHTML = '';
      scenes.forEach((scene, index) => {
        const button = document.createElement('button');
        button.type = 'button';
        button.className = 'scene-btn';
        button.dataset.scene = scene.id;
        button.setAttribute('role', 'tab');
        button.textContent = (index + 1) + '. ' + scene.title;
        if (index >= revealed) {
          button.classList.add('hidden');
        }
        if (scene.id === activeId) {
          button.classList.add('active');
          button.setAttribute('aria-selected', 'true');
        }
        button.addEventListener('click', () => showScene(scene.id));
        nav.appendChild(button);
      });
    };

    const showScene = async (id) => {
      const params = new URLSearchParams({
        width: String(container.clientWidth || 900),
        height: String(container.clientHeight || 480)
      });
      const res = await fetch('/api/scene/' + id + '?' + params);
      if (!res.ok) {
        setStatus(await res.text(), 'error');
        return;
      }
      const scene = await res.json();

      // Clear-then-populate: the container owns exactly one chart.
      container.innerHTML = scene.svg;
      titleEl.textContent = scene.title;
      subtitleEl.textContent = scene.subtitle;
      activeId = scene.id;

      const index = scenes.findIndex((entry) => entry.id === id);
      if (index >= 0) {
        revealed = Math.max(revealed, Math.min(index + 2, scenes.length));
      }
      renderNav();
      wireTooltips();
      setStatus('', '');
    };

    const loadSummary = async () => {
      const res = await fetch('/api/summary');
      if (!res.ok) {
        return;
      }
      const summary = await res.json();
      document.getElementById('stat-records').textContent = summary.records;
      document.getElementById('stat-regions').textContent = summary.regions;
      document.getElementById('stat-cases').textContent = compact(summary.total_cases);
      document.getElementById('stat-deaths').textContent = compact(summary.total_deaths);
    };

    const init = async () => {
      const res = await fetch('/api/scenes');
      if (!res.ok) {
        setStatus('Unable to load the scene list', 'error');
        return;
      }
      scenes = await res.json();
      renderNav();
      await loadSummary();
      if (scenes.length > 0) {
        await showScene(scenes[0].id);
      }
    };

    init().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
