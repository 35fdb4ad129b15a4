use crate::models::{Mode, SessionView};
use crate::stats::metric;

pub fn render_index(view: &SessionView) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &view.date)
        .replace("{{STREAK}}", &streak_caption(view))
        .replace("{{STEPS}}", &metric(view.stats.steps))
        .replace("{{WATER}}", &metric(view.stats.water_oz))
        .replace("{{CALORIES}}", &metric(view.stats.calories))
        .replace("{{ACTIVE}}", &metric(view.stats.active_minutes))
        .replace("{{MODE_OPTIONS}}", &mode_options(view.mode))
}

fn streak_caption(view: &SessionView) -> String {
    let mut caption = format!("Streak: {} day(s)", view.streak);
    if view.checked_in_today {
        caption.push_str(" · checked off today");
    }
    caption
}

fn mode_options(selected: Mode) -> String {
    Mode::ALL
        .iter()
        .map(|mode| {
            let flag = if *mode == selected { " selected" } else { "" };
            format!(r#"<option value="{0}"{flag}>{0}</option>"#, mode.label())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatLog;

    fn view() -> SessionView {
        SessionView {
            date: "2026-03-04".into(),
            streak: 3,
            checked_in_today: true,
            reflection_pending: false,
            mode: Mode::Intermediate,
            stats: StatLog {
                steps: Some(5000),
                ..StatLog::default()
            },
            greeting: None,
            transcript: Vec::new(),
        }
    }

    #[test]
    fn page_shows_streak_and_metrics() {
        let html = render_index(&view());
        assert!(html.contains("Streak: 3 day(s) · checked off today"));
        assert!(html.contains(r#"<span id="metric-steps" class="value">5000</span>"#));
        assert!(html.contains(r#"<span id="metric-water" class="value">—</span>"#));
        assert!(html.contains(r#"<option value="Intermediate" selected>Intermediate</option>"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn mode_changes_are_saved_and_reset_locks_while_busy() {
        let html = render_index(&view());
        assert!(html.contains("call('PUT', '/api/mode', { mode: $('mode').value })"));
        assert!(html.contains("$('reset-btn').disabled = busy;"));
    }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Daily Health Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef6ef;
      --bg-2: #bfe3c9;
      --ink: #24302a;
      --accent: #3f9d6b;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e3f1e6 60%, #f4f8f2 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .layout {
      width: min(1120px, 100%);
      margin: 0 auto;
      display: grid;
      grid-template-columns: 280px 1fr;
      gap: 24px;
      align-items: start;
    }

    .card {
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 18px;
      animation: rise 600ms ease;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0;
      font-size: 1.2rem;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
      font-size: 0.95rem;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #7b776f;
    }

    input, textarea, select {
      font: inherit;
      font-size: 1rem;
      text-transform: none;
      letter-spacing: normal;
      color: var(--ink);
      border: 1px solid rgba(47, 72, 88, 0.16);
      border-radius: 14px;
      padding: 10px 12px;
      background: white;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 14px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .transcript {
      display: grid;
      gap: 12px;
      max-height: 460px;
      overflow-y: auto;
      padding-right: 4px;
    }

    .turn {
      border-radius: 18px;
      padding: 12px 16px;
      white-space: pre-wrap;
      line-height: 1.45;
    }

    .turn.assistant {
      background: white;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .turn.user {
      background: rgba(63, 157, 107, 0.12);
      justify-self: end;
      max-width: 85%;
    }

    .composer {
      display: grid;
      grid-template-columns: 1fr auto;
      gap: 12px;
    }

    .actions {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      transition: transform 150ms ease, box-shadow 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    button:disabled {
      opacity: 0.5;
      cursor: progress;
    }

    .btn-primary {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(63, 157, 107, 0.3);
    }

    .btn-secondary {
      background: var(--accent-2);
      color: white;
      box-shadow: 0 10px 24px rgba(47, 72, 88, 0.3);
    }

    .btn-ghost {
      background: rgba(47, 72, 88, 0.08);
      color: var(--accent-2);
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.85rem;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 820px) {
      .layout {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <div class="layout">
    <aside class="card">
      <h2>Today's stats</h2>
      <form id="stats-form" class="panel">
        <label>Steps <input id="steps" type="number" min="0" step="1" /></label>
        <label>Water (oz) <input id="water_oz" type="number" min="0" step="1" /></label>
        <label>Calories (optional) <input id="calories" type="number" min="0" step="1" /></label>
        <label>Active minutes <input id="active_minutes" type="number" min="0" step="1" /></label>
        <label>Workout (optional) <input id="workout" type="text" /></label>
        <label>Notes (optional) <textarea id="notes" rows="3"></textarea></label>
        <button class="btn-secondary" type="submit">Save stats</button>
      </form>
      <p class="hint">Everything stays in this browser session only.</p>
    </aside>

    <main class="card">
      <header>
        <h1>Daily Health Tracker</h1>
        <p class="subtitle">A health app designed to motivate, not shame you. No medical advice provided.</p>
        <p class="subtitle" id="streak">{{STREAK}}</p>
      </header>

      <section class="panel">
        <div class="stat">
          <span class="label">Steps</span>
          <span id="metric-steps" class="value">{{STEPS}}</span>
        </div>
        <div class="stat">
          <span class="label">Water (oz)</span>
          <span id="metric-water" class="value">{{WATER}}</span>
        </div>
        <div class="stat">
          <span class="label">Calories</span>
          <span id="metric-calories" class="value">{{CALORIES}}</span>
        </div>
        <div class="stat">
          <span class="label">Active min</span>
          <span id="metric-active" class="value">{{ACTIVE}}</span>
        </div>
      </section>

      <label>Mode
        <select id="mode">{{MODE_OPTIONS}}</select>
      </label>

      <section class="transcript" id="transcript" aria-live="polite"></section>

      <form class="composer" id="chat-form">
        <input id="message" type="text" placeholder="Type your check-in here" autocomplete="off" />
        <button class="btn-primary" id="send-btn" type="submit">Send</button>
      </form>

      <div class="status" id="status"></div>

      <section class="actions">
        <button class="btn-ghost" id="reflection-btn" type="button">Reflection</button>
        <form method="post" action="/complete" id="complete-form">
          <button class="btn-primary" id="complete-btn" type="submit">Complete today</button>
        </form>
        <form method="post" action="/reset" id="reset-form">
          <button class="btn-secondary" id="reset-btn" type="submit">New day / reset chat</button>
        </form>
      </section>
      <p class="hint">Today is {{DATE}} (server time). Streaks count days marked complete.</p>
    </main>
  </div>

  <script>
    const $ = (id) => document.getElementById(id);
    const numberFields = ['steps', 'water_oz', 'calories', 'active_minutes'];
    const textFields = ['workout', 'notes'];
    const metrics = {
      steps: 'metric-steps',
      water_oz: 'metric-water',
      calories: 'metric-calories',
      active_minutes: 'metric-active'
    };

    const setStatus = (message, type) => {
      $('status').textContent = message;
      $('status').dataset.type = type || '';
    };

    const setBusy = (busy) => {
      $('send-btn').disabled = busy;
      $('reflection-btn').disabled = busy;
      $('reset-btn').disabled = busy;
      if (busy) {
        setStatus('Thinking...', 'info');
      }
    };

    const renderTurn = (role, content) => {
      const el = document.createElement('div');
      el.className = `turn ${role}`;
      el.textContent = content;
      $('transcript').appendChild(el);
    };

    const render = (view) => {
      let caption = `Streak: ${view.streak} day(s)`;
      if (view.checked_in_today) {
        caption += ' · checked off today';
      }
      $('streak').textContent = caption;

      numberFields.forEach((field) => {
        const value = view.stats[field];
        $(metrics[field]).textContent = value === null ? '—' : String(value);
        $(field).value = value === null ? '' : value;
      });
      textFields.forEach((field) => {
        $(field).value = view.stats[field] || '';
      });

      $('mode').value = view.mode;
      $('complete-btn').disabled = view.checked_in_today;
      $('complete-btn').textContent = view.checked_in_today ? 'You already checked in today' : 'Complete today';

      $('transcript').innerHTML = '';
      if (view.greeting) {
        renderTurn('assistant', view.greeting);
      }
      view.transcript.forEach((turn) => renderTurn(turn.role, turn.content));
      $('transcript').scrollTop = $('transcript').scrollHeight;
    };

    const call = async (method, path, body) => {
      const res = await fetch(path, {
        method,
        headers: body ? { 'content-type': 'application/json' } : {},
        body: body ? JSON.stringify(body) : undefined
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const refresh = async () => render(await call('GET', '/api/session'));

    const readNumber = (field) => {
      const raw = $(field).value.trim();
      return raw === '' ? null : Number(raw);
    };

    $('stats-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const body = {};
      numberFields.forEach((field) => { body[field] = readNumber(field); });
      textFields.forEach((field) => { body[field] = $(field).value; });
      call('PUT', '/api/stats', body)
        .then((view) => {
          render(view);
          setStatus('Saved', 'ok');
          setTimeout(() => setStatus('', ''), 1200);
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    $('chat-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const message = $('message').value.trim();
      if (!message) {
        return;
      }
      renderTurn('user', message);
      $('message').value = '';
      setBusy(true);
      call('POST', '/api/checkin', { message, mode: $('mode').value })
        .then((view) => {
          render(view);
          setStatus('', '');
        })
        .catch((err) => {
          setStatus(err.message, 'error');
          return refresh();
        })
        .catch((err) => setStatus(err.message, 'error'))
        .finally(() => setBusy(false));
    });

    $('mode').addEventListener('change', () => {
      call('PUT', '/api/mode', { mode: $('mode').value })
        .then(render)
        .catch((err) => setStatus(err.message, 'error'));
    });

    $('reflection-btn').addEventListener('click', () => {
      call('POST', '/api/reflection')
        .then((view) => {
          render(view);
          setStatus('Reflection requested. Send a message to get your summary.', 'ok');
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    [['complete-form', '/api/complete'], ['reset-form', '/api/reset']].forEach(([id, path]) => {
      $(id).addEventListener('submit', (event) => {
        event.preventDefault();
        call('POST', path)
          .then(render)
          .catch((err) => setStatus(err.message, 'error'));
      });
    });

    refresh().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
