use crate::models::{Badge, HabitView, StatsResponse};

pub fn render_index(date: &str, habits: &[HabitView], badges: &[Badge], stats: &StatsResponse) -> String {
    let earned = badges.iter().filter(|badge| badge.earned).count();
    INDEX_HTML
        .replace("{{DATE}}", date)
        .replace("{{ACTIVE}}", &stats.summary.active_habits.to_string())
        .replace("{{TOTAL}}", &stats.summary.total_completed.to_string())
        .replace("{{STREAKS}}", &stats.summary.total_current_streaks.to_string())
        .replace("{{BEST}}", &stats.summary.best_streak.to_string())
        .replace("{{EARNED}}", &format!("{earned}/{}", badges.len()))
        .replace("{{HABITS}}", &render_habits(habits))
        .replace("{{WEEK}}", &render_week(stats))
        .replace("{{BADGES}}", &render_badges(badges))
}

fn render_habits(habits: &[HabitView]) -> String {
    if habits.is_empty() {
        return r#"<p class="empty">No habits yet. Add one above to start a streak.</p>"#.to_string();
    }

    habits
        .iter()
        .map(|view| {
            let habit = &view.habit;
            let (label, class) = if view.completed_today {
                ("Done today", "btn-done")
            } else {
                ("Mark done", "btn-todo")
            };
            format!(
                r#"<article class="habit" style="--habit: {color}">
  <div class="habit-head">
    <h3>{name}</h3>
    <form method="post" action="/habits/{id}/delete"><button class="btn-delete" type="submit" aria-label="Delete">&times;</button></form>
  </div>
  <p class="description">{description}</p>
  <div class="habit-stats">
    <span><strong>{current}</strong> current</span>
    <span><strong>{longest}</strong> best</span>
    <span><strong>{rate}%</strong> rate</span>
    <span><strong>{count}</strong> done</span>
  </div>
  <form method="post" action="/habits/{id}/toggle"><button class="{class}" type="submit">{label}</button></form>
</article>"#,
                color = escape_html(&habit.color),
                name = escape_html(&habit.name),
                id = escape_html(&habit.id),
                description = escape_html(&habit.description),
                current = habit.current_streak,
                longest = habit.longest_streak,
                rate = view.completion_rate,
                count = habit.completions(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_week(stats: &StatsResponse) -> String {
    let max = stats
        .this_week
        .iter()
        .map(|point| point.completions)
        .max()
        .unwrap_or(0)
        .max(1);

    stats
        .this_week
        .iter()
        .map(|point| {
            let height = point.completions * 100 / max;
            format!(
                r#"<div class="bar" title="{date}"><span class="fill" style="height: {height}%"></span><span class="count">{count}</span><span class="day">{day}</span></div>"#,
                date = point.date,
                count = point.completions,
                day = point.day,
            )
        })
        .collect()
}

fn render_badges(badges: &[Badge]) -> String {
    badges
        .iter()
        .map(|badge| {
            let (class, earned_on) = match badge.date_earned {
                Some(at) if badge.earned => ("badge earned", at.format("%Y-%m-%d").to_string()),
                _ => ("badge locked", String::from("locked")),
            };
            format!(
                r#"<li class="{class}"><span class="icon">{icon}</span><div><strong>{name}</strong><p>{description}</p><small>{earned_on}</small></div></li>"#,
                icon = escape_html(&badge.icon),
                name = escape_html(&badge.name),
                description = escape_html(&badge.description),
            )
        })
        .collect()
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Hero</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #23221f;
      --muted: #7b766e;
      --accent: #22c55e;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(35, 34, 31, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      margin: 0;
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 14px;
    }

    .stat, .habit, .card {
      background: var(--card);
      border-radius: 18px;
      padding: 18px;
      box-shadow: var(--shadow);
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    .add-form {
      display: grid;
      grid-template-columns: 2fr 3fr auto auto;
      gap: 10px;
    }

    input, select, button {
      font: inherit;
      border-radius: 12px;
      border: 1px solid rgba(35, 34, 31, 0.15);
      padding: 10px 14px;
    }

    button {
      cursor: pointer;
      border: none;
      font-weight: 600;
    }

    .habits {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
      gap: 16px;
    }

    .habit {
      border-top: 6px solid var(--habit);
      display: grid;
      gap: 10px;
    }

    .habit-head {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .habit h3 {
      margin: 0;
    }

    .description {
      margin: 0;
      color: var(--muted);
    }

    .habit-stats {
      display: flex;
      gap: 12px;
      flex-wrap: wrap;
      font-size: 0.9rem;
    }

    .btn-todo {
      width: 100%;
      background: var(--habit);
      color: white;
    }

    .btn-done {
      width: 100%;
      background: #e8f8ee;
      color: #15803d;
    }

    .btn-delete {
      background: transparent;
      color: var(--muted);
      font-size: 1.3rem;
      padding: 0 6px;
    }

    .week {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 10px;
      height: 180px;
      align-items: end;
    }

    .bar {
      display: flex;
      flex-direction: column-reverse;
      align-items: center;
      height: 100%;
      gap: 4px;
    }

    .bar .fill {
      width: 70%;
      background: var(--accent);
      border-radius: 6px 6px 0 0;
      min-height: 2px;
    }

    .bar .day, .bar .count {
      font-size: 0.8rem;
      color: var(--muted);
    }

    .badges {
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
      gap: 12px;
    }

    .badge {
      display: flex;
      gap: 12px;
      align-items: center;
      padding: 12px;
      border-radius: 14px;
      background: #faf8f4;
    }

    .badge.locked {
      opacity: 0.45;
      filter: grayscale(1);
    }

    .badge .icon {
      font-size: 1.8rem;
    }

    .badge p {
      margin: 2px 0;
      font-size: 0.85rem;
    }

    .empty {
      color: var(--muted);
    }

    @media (max-width: 640px) {
      .add-form {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Habit Hero</h1>
      <p class="subtitle">Today is <span id="date">{{DATE}}</span> (UTC).</p>
    </header>

    <section class="panel">
      <div class="stat"><span class="label">Active habits</span><span class="value">{{ACTIVE}}</span></div>
      <div class="stat"><span class="label">Total done</span><span class="value">{{TOTAL}}</span></div>
      <div class="stat"><span class="label">Total streaks</span><span class="value">{{STREAKS}}</span></div>
      <div class="stat"><span class="label">Best streak</span><span class="value">{{BEST}}</span></div>
      <div class="stat"><span class="label">Badges</span><span class="value">{{EARNED}}</span></div>
    </section>

    <form class="add-form card" method="post" action="/habits">
      <input name="name" placeholder="New habit" required />
      <input name="description" placeholder="Description (optional)" />
      <select name="color">
        <option value="#22c55e">Green</option>
        <option value="#3b82f6">Blue</option>
        <option value="#f59e0b">Amber</option>
        <option value="#ef4444">Red</option>
        <option value="#8b5cf6">Violet</option>
        <option value="#06b6d4">Cyan</option>
        <option value="#f97316">Orange</option>
        <option value="#84cc16">Lime</option>
      </select>
      <button type="submit">Add habit</button>
    </form>

    <section class="habits">
{{HABITS}}
    </section>

    <section class="card">
      <h2>This week</h2>
      <div class="week">{{WEEK}}</div>
    </section>

    <section class="card">
      <h2>Badges</h2>
      <ul class="badges">{{BADGES}}</ul>
    </section>
  </main>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::default_badges;
    use crate::models::{Habit, DEFAULT_HABIT_COLOR};
    use crate::stats::build_stats_at;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn index_escapes_habit_names() {
        let habit = Habit {
            id: "h1".into(),
            name: "<script>alert(1)</script>".into(),
            description: "Tom & Jerry".into(),
            color: DEFAULT_HABIT_COLOR.into(),
            dates_completed: ["2026-01-07".to_string()].into_iter().collect(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            current_streak: 1,
            longest_streak: 1,
        };
        let stats = build_stats_at(NaiveDate::from_ymd_opt(2026, 1, 7).unwrap(), &[habit.clone()]);
        let views = vec![HabitView {
            habit,
            completion_rate: 14,
            completed_today: true,
        }];

        let html = render_index("2026-01-07", &views, &default_badges(), &stats);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("Done today"));
        assert!(html.contains("0/5"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn index_lists_every_palette_color() {
        let stats = build_stats_at(NaiveDate::from_ymd_opt(2026, 1, 7).unwrap(), &[]);
        let html = render_index("2026-01-07", &[], &default_badges(), &stats);
        for color in crate::models::HABIT_COLORS {
            assert!(html.contains(&format!(r##"<option value="{color}">"##)), "{color}");
        }
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn index_without_habits_shows_hint() {
        let stats = build_stats_at(NaiveDate::from_ymd_opt(2026, 1, 7).unwrap(), &[]);
        let html = render_index("2026-01-07", &[], &default_badges(), &stats);
        assert!(html.contains("No habits yet"));
    }
}
