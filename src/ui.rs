use crate::models::{Habit, ICON_PALETTE, icon_glyph};
use crate::progress::Progress;
use crate::tracker::Tracker;
use crate::validation::FormView;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// State of the two forms for one page render. The default is a clean page.
#[derive(Debug, Default)]
pub struct PageForms {
    pub habit: FormView,
    pub day: FormView,
    pub popup_open: bool,
}

pub fn render_index(tracker: &Tracker, forms: &PageForms) -> String {
    let active = tracker.active();
    let active_id = tracker.active_id().map(|id| id.to_string()).unwrap_or_default();

    let page = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Habit Tracker" }
                style { (PreEscaped(INDEX_CSS)) }
            }
            body data-active-id=(active_id) {
                div.app {
                    nav.menu {
                        div.menu__list { (render_menu(tracker.habits(), active)) }
                        button.menu__add type="button" data-toggle-popup title="Add habit" { "+" }
                    }
                    main.content {
                        header.header { (render_header(active)) }
                        section #days { (render_content(active, &forms.day)) }
                    }
                }
                (render_popup(tracker.icon_choice(), forms))
                script { (PreEscaped(INDEX_JS)) }
            }
        }
    };
    page.into_string()
}

/// One entry per habit in collection order. Only the active entry shows its
/// delete button; the others keep it in the layout, hidden.
pub fn render_menu(habits: &[Habit], active: Option<&Habit>) -> Markup {
    html! {
        @for habit in habits {
            @let is_active = active.is_some_and(|active| active.id == habit.id);
            div.menu__item-container {
                div.menu__item-wrapper.menu__item-wrapper-active[is_active] {
                    a.menu__item href={ "/habits/" (habit.id) } title=(habit.name) data-habit-id=(habit.id) {
                        span.menu__glyph { (icon_glyph(&habit.icon).unwrap_or(habit.icon.as_str())) }
                    }
                    form.menu__item-delete-form method="post" action={ "/habits/" (habit.id) "/delete" } {
                        button.menu__item-delete.hidden[!is_active] type="submit" title="Delete habit" { "×" }
                    }
                }
            }
        }
    }
}

pub fn render_header(active: Option<&Habit>) -> Markup {
    let progress = active.map(Progress::of).unwrap_or_else(Progress::empty);
    html! {
        h1.h1 { @if let Some(habit) = active { (habit.name) } }
        div.progress {
            div.progress__text {
                div.progress__name { "Progress" }
                div.progress__percent { (progress.label) }
            }
            div.progress__bar {
                div.progress__cover-bar style=(progress.width_style()) {}
            }
        }
    }
}

/// Day rows of the active habit. Each delete button carries the row's
/// current position, valid until the next render.
pub fn render_content(active: Option<&Habit>, form: &FormView) -> Markup {
    let Some(habit) = active else {
        return html! {
            div.habit.habit_empty {
                div.habit__day {}
                p.habit__comment { "Add a habit to start tracking." }
            }
        };
    };

    html! {
        @for (index, day) in habit.days.iter().enumerate() {
            div.habit {
                div.habit__day { "Day " (index + 1) }
                div.habit__comment { (day.comment) }
                form.habit__delete-form method="post" action={ "/days/" (index) "/delete" } {
                    button.habit__delete type="submit" title={ "Delete day " (index + 1) } { "×" }
                }
            }
        }
        div.habit {
            div.habit__day { "Day " (habit.days.len() + 1) }
            form.habit__form method="post" action="/days" {
                input.input.habit__input.error[form.is_invalid("comment")]
                    type="text" name="comment" placeholder="Comment" value=[form.value("comment")];
                button.button type="submit" { "Done" }
            }
        }
    }
}

fn render_popup(icon_choice: &str, forms: &PageForms) -> Markup {
    let form = &forms.habit;
    let icon = form.value("icon").unwrap_or(icon_choice);
    html! {
        div #add-habit-popup .cover.cover_hidden[!forms.popup_open] {
            div.popup {
                button.popup__close type="button" data-toggle-popup title="Close" { "×" }
                h2 { "New habit" }
                form.popup__form method="post" action="/habits" {
                    div.icon-label { "Icon" }
                    div.icon-select.error[form.is_invalid("icon")] {
                        @for (name, glyph) in ICON_PALETTE {
                            button.icon.icon_active[*name == icon] type="button" data-icon=(name) title=(name) { (glyph) }
                        }
                    }
                    input type="hidden" name="icon" value=(icon);
                    input.input.error[form.is_invalid("name")]
                        type="text" name="name" placeholder="Name" value=[form.value("name")];
                    input.input.error[form.is_invalid("target")]
                        type="text" inputmode="numeric" name="target" placeholder="Target" value=[form.value("target")];
                    button.button type="submit" { "Add" }
                }
            }
        }
    }
}

const INDEX_CSS: &str = r#"
* {
  box-sizing: border-box;
}

body {
  margin: 0;
  min-height: 100vh;
  background: #f3f5fb;
  color: #23263a;
  font-family: "Inter", "Segoe UI", sans-serif;
}

.app {
  display: flex;
  min-height: 100vh;
}

.menu {
  width: 120px;
  padding: 32px 0;
  background: white;
  display: flex;
  flex-direction: column;
  align-items: center;
  gap: 18px;
  box-shadow: 4px 0 24px rgba(35, 38, 58, 0.06);
}

.menu__list {
  display: flex;
  flex-direction: column;
  gap: 18px;
}

.menu__item-wrapper {
  position: relative;
}

.menu__item {
  width: 56px;
  height: 56px;
  border-radius: 16px;
  display: grid;
  place-items: center;
  background: #eef0f8;
  font-size: 1.6rem;
  text-decoration: none;
  color: inherit;
}

.menu__item-wrapper-active .menu__item {
  background: #5051f9;
}

.menu__item-delete-form {
  position: absolute;
  top: -8px;
  right: -8px;
  margin: 0;
}

.menu__item-delete,
.menu__add,
.popup__close,
.habit__delete {
  border: none;
  cursor: pointer;
  background: transparent;
  font-size: 1.2rem;
  color: #8c8fa5;
}

.menu__add {
  width: 56px;
  height: 56px;
  border-radius: 16px;
  border: 2px dashed #c6c8da;
  font-size: 1.6rem;
}

.hidden {
  visibility: hidden;
}

.content {
  flex: 1;
  padding: 40px 48px;
  display: grid;
  gap: 32px;
  align-content: start;
}

.header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: 32px;
}

.h1 {
  margin: 0;
  font-size: 2rem;
  min-height: 1.2em;
}

.progress {
  width: 320px;
}

.progress__text {
  display: flex;
  justify-content: space-between;
  margin-bottom: 8px;
  color: #8c8fa5;
}

.progress__bar {
  height: 8px;
  border-radius: 4px;
  background: #e0e2ee;
  overflow: hidden;
}

.progress__cover-bar {
  height: 100%;
  background: #5051f9;
  transition: width 200ms ease;
}

.habit {
  display: flex;
  align-items: center;
  background: white;
  border-radius: 12px;
  margin-bottom: 12px;
}

.habit__day {
  min-width: 110px;
  padding: 18px;
  border-right: 1px solid #eef0f8;
  font-weight: 600;
}

.habit__comment {
  flex: 1;
  padding: 18px;
}

.habit__delete-form {
  margin: 0 12px;
}

.habit__form {
  flex: 1;
  display: flex;
  gap: 12px;
  padding: 10px 18px;
}

.input {
  flex: 1;
  padding: 12px 14px;
  border-radius: 10px;
  border: 1px solid #e0e2ee;
  font-size: 1rem;
}

.error {
  border: 1px solid #ff5c5c;
  border-radius: 10px;
}

.button {
  border: none;
  border-radius: 10px;
  padding: 12px 22px;
  background: #5051f9;
  color: white;
  font-weight: 600;
  cursor: pointer;
}

.cover {
  position: fixed;
  inset: 0;
  background: rgba(35, 38, 58, 0.45);
  display: grid;
  place-items: center;
}

.cover_hidden {
  display: none;
}

.popup {
  position: relative;
  width: min(420px, 92vw);
  background: white;
  border-radius: 16px;
  padding: 28px;
}

.popup__close {
  position: absolute;
  top: 12px;
  right: 12px;
}

.popup__form {
  display: grid;
  gap: 14px;
}

.icon-select {
  display: flex;
  gap: 10px;
  padding: 4px;
}

.icon {
  width: 48px;
  height: 48px;
  border-radius: 12px;
  border: 2px solid transparent;
  background: #eef0f8;
  font-size: 1.4rem;
  cursor: pointer;
}

.icon_active {
  border-color: #5051f9;
}
"#;

const INDEX_JS: &str = r#"
const popup = document.getElementById('add-habit-popup');
const iconField = document.querySelector('.popup__form input[name="icon"]');

document.querySelectorAll('[data-toggle-popup]').forEach((button) => {
  button.addEventListener('click', () => popup.classList.toggle('cover_hidden'));
});

document.querySelectorAll('.icon[data-icon]').forEach((button) => {
  button.addEventListener('click', () => {
    iconField.value = button.dataset.icon;
    document.querySelectorAll('.icon.icon_active').forEach((el) => el.classList.remove('icon_active'));
    button.classList.add('icon_active');
  });
});

if (location.pathname === '/') {
  const rendered = document.body.dataset.activeId;
  const requested = location.hash.replace('#', '');
  if (requested !== rendered) {
    location.replace('/restore?fragment=' + encodeURIComponent(requested));
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Target;
    use crate::validation::{HABIT_FIELDS, validate};
    use std::collections::HashMap;

    fn tracker_with_days(days: &[&str]) -> Tracker {
        let mut tracker = Tracker::default();
        tracker.add_habit("Run".into(), "sport".into(), Target::Text("4".into()));
        for day in days {
            tracker.add_day(day.to_string());
        }
        tracker
    }

    #[test]
    fn menu_marks_only_the_active_entry() {
        let mut tracker = tracker_with_days(&[]);
        tracker.add_habit("Swim".into(), "water".into(), Target::Text("2".into()));
        let html = render_menu(tracker.habits(), tracker.active()).into_string();

        assert_eq!(html.matches("menu__item-container").count(), 2);
        assert_eq!(html.matches("menu__item-wrapper-active").count(), 1);
        assert_eq!(html.matches("menu__item-delete hidden").count(), 1);
        assert!(html.contains(r#"href="/habits/1""#));
        assert!(html.contains(r#"action="/habits/2/delete""#));
    }

    #[test]
    fn header_shows_name_and_progress() {
        let tracker = tracker_with_days(&["a", "b"]);
        let html = render_header(tracker.active()).into_string();

        assert!(html.contains(r#"<h1 class="h1">Run</h1>"#));
        assert!(html.contains(">50%<"));
        assert!(html.contains(r#"style="width: 50%""#));
    }

    #[test]
    fn empty_header_resets_progress() {
        let html = render_header(None).into_string();
        assert!(html.contains(r#"<h1 class="h1"></h1>"#));
        assert!(html.contains(">0%<"));
        assert!(html.contains(r#"style="width: 0%""#));
    }

    #[test]
    fn content_numbers_days_and_previews_next() {
        let tracker = tracker_with_days(&["A", "C"]);
        let html = render_content(tracker.active(), &FormView::default()).into_string();

        assert!(html.contains("Day 1"));
        assert!(html.contains("Day 2"));
        assert!(html.contains("Day 3"));
        assert!(html.contains(r#"action="/days/1/delete""#));
        assert!(!html.contains(r#"action="/days/2/delete""#));
    }

    #[test]
    fn comments_are_escaped() {
        let tracker = tracker_with_days(&["<b>bold</b>"]);
        let html = render_content(tracker.active(), &FormView::default()).into_string();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn rejected_popup_is_open_with_marks() {
        let tracker = Tracker::default();
        let submitted: HashMap<String, String> = [("name", "Run"), ("icon", "water"), ("target", "")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let invalid = validate(&submitted, HABIT_FIELDS).unwrap_err();
        let forms = PageForms {
            habit: FormView::rejected(submitted, invalid),
            popup_open: true,
            ..PageForms::default()
        };
        let html = render_index(&tracker, &forms);

        assert!(!tag_with(&html, r#"id="add-habit-popup""#).contains("cover_hidden"));
        assert!(tag_with(&html, r#"name="target""#).contains(r#"class="input error""#));
        let name = tag_with(&html, r#"name="name""#);
        assert!(name.contains(r#"class="input""#));
        assert!(name.contains(r#"value="Run""#));
        assert!(tag_with(&html, r#"data-icon="water""#).contains(r#"class="icon icon_active""#));
    }

    #[test]
    fn clean_page_keeps_popup_hidden() {
        let html = render_index(&tracker_with_days(&[]), &PageForms::default());
        assert!(tag_with(&html, r#"id="add-habit-popup""#).contains("cover cover_hidden"));
        assert!(html.contains(r#"<section id="days">"#));
        assert!(html.contains(r#"data-active-id="1""#));
    }

    fn tag_with<'a>(html: &'a str, marker: &str) -> &'a str {
        let at = html.find(marker).expect("marker not rendered");
        let start = html[..at].rfind('<').unwrap();
        let end = at + html[at..].find('>').unwrap();
        &html[start..=end]
    }
}
