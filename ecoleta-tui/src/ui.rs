use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use ecoleta_core::loader::LoadStatus;

use crate::app::{App, Focus, StatusMessage};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: header, form, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let header = Paragraph::new(format!(
        "Ecoleta – collection point registration · Counter: {}",
        app.counter
    ))
    .block(Block::default().borders(Borders::ALL).title("Ecoleta"));
    frame.render_widget(header, *header_area);

    draw_form(frame, app, *content_area);
    draw_status(frame, app, *status_area);
}

fn draw_form(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // counter button
            Constraint::Length(3), // name
            Constraint::Length(3), // email + whatsapp
            Constraint::Length(3), // position
            Constraint::Length(3), // uf + city
            Constraint::Min(3),    // items
            Constraint::Length(3), // submit
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [
        counter_area,
        name_area,
        contact_area,
        position_area,
        location_area,
        items_area,
        submit_area,
    ] = chunks
    else {
        return;
    };

    frame.render_widget(
        button("Increase", app.focus == Focus::Counter),
        *counter_area,
    );

    frame.render_widget(
        text_field("Entity name", &app.form.name, app.focus == Focus::Name),
        *name_area,
    );

    let [email_area, whatsapp_area] = split_pair(*contact_area);
    frame.render_widget(
        text_field("E-mail", &app.form.email, app.focus == Focus::Email),
        email_area,
    );
    frame.render_widget(
        text_field("WhatsApp", &app.form.whatsapp, app.focus == Focus::Whatsapp),
        whatsapp_area,
    );

    let position = app.form.position;
    let position_text = format!(
        "lat {:.6} · lon {:.6}",
        position.latitude, position.longitude
    );
    frame.render_widget(
        Paragraph::new(position_text).block(field_block(
            "Address position (arrows move the marker)",
            app.focus == Focus::Position,
        )),
        *position_area,
    );

    let [uf_area, city_area] = split_pair(*location_area);
    draw_selects(frame, app, uf_area, city_area);

    draw_items(frame, app, *items_area);

    let submit_label = if app.is_submitting {
        "Registering…"
    } else {
        "Register collection point"
    };
    frame.render_widget(
        button(submit_label, app.focus == Focus::Submit),
        *submit_area,
    );
}

fn draw_selects(frame: &mut Frame<'_>, app: &App, uf_area: Rect, city_area: Rect) {
    let loader = app.driver.loader();

    let uf_label = loader
        .selection()
        .province
        .as_selected()
        .map_or("Select a UF".to_owned(), ToString::to_string);
    let uf_title = select_title(
        "UF",
        loader.provinces_status(),
        loader.provinces().len(),
        "no UFs available",
    );
    frame.render_widget(
        select_widget(
            &uf_label,
            app.province_index(),
            loader.provinces().len(),
            uf_title,
            loader.provinces_status(),
            app.focus == Focus::Province,
        ),
        uf_area,
    );

    let city_label = loader
        .selection()
        .city
        .as_selected()
        .map_or("Select a city".to_owned(), ToString::to_string);
    let city_title = if loader.selection().province.is_unselected() {
        "City (select a UF first)".to_owned()
    } else {
        select_title(
            "City",
            loader.cities_status(),
            loader.cities().len(),
            "no cities available",
        )
    };
    frame.render_widget(
        select_widget(
            &city_label,
            app.city_index(),
            loader.cities().len(),
            city_title,
            loader.cities_status(),
            app.focus == Focus::City,
        ),
        city_area,
    );
}

fn draw_items(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let loader = app.driver.loader();
    let title = select_title(
        "Collection items (←/→ move, Space toggles)",
        loader.items_status(),
        loader.items().len(),
        "the catalog is empty",
    );

    let entries = if loader.items().is_empty() {
        let placeholder = match loader.items_status() {
            LoadStatus::Loading => "Loading items…",
            LoadStatus::Failed(_) => "Items could not be loaded. Press Ctrl-R to retry.",
            LoadStatus::Idle | LoadStatus::Ready => "No items to choose from.",
        };
        vec![ListItem::new(placeholder)]
    } else {
        loader
            .items()
            .iter()
            .map(|item| {
                let mark = if app.form.is_item_selected(item.id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                ListItem::new(format!("{mark} {}  ({})", item.title, item.image_url))
            })
            .collect()
    };

    let list = List::new(entries)
        .block(field_block(&title, app.focus == Focus::Items))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if app.focus == Focus::Items && !loader.items().is_empty() {
        state.select(Some(app.item_cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let nav_hint = match app.focus {
        Focus::Counter => "Enter/+ increase · Tab next field · Esc quit",
        Focus::Name | Focus::Email | Focus::Whatsapp => {
            "Type to edit · Tab/Shift-Tab switch field · Esc quit"
        }
        Focus::Position => "Arrows move the marker · Tab next field · Esc quit",
        Focus::Province | Focus::City => "↑/↓ change selection · Tab next field · Esc quit",
        Focus::Items => "←/→ move · Space toggle · Tab next field · Esc quit",
        Focus::Submit => "Enter register · Ctrl-R reload failed lists · Esc quit",
    };

    let loading = app.is_submitting || any_loading(app);

    let status_text = match &app.status {
        Some(StatusMessage::Error(msg) | StatusMessage::Info(msg)) => format!("{msg} · {nav_hint}"),
        None if loading => format!("Loading… · {nav_hint}"),
        None => nav_hint.to_owned(),
    };

    let status_style = match &app.status {
        Some(StatusMessage::Error(_)) => Style::default().fg(Color::Red),
        Some(StatusMessage::Info(_)) => Style::default().fg(Color::Green),
        None if loading => Style::default().fg(Color::Yellow),
        None => Style::default(),
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, area);
}

fn any_loading(app: &App) -> bool {
    let loader = app.driver.loader();
    [
        loader.items_status(),
        loader.provinces_status(),
        loader.cities_status(),
    ]
    .into_iter()
    .any(|status| *status == LoadStatus::Loading)
}

/// Title of a select, annotated with its load state. An empty but successful
/// load is reported differently from a failure.
fn select_title(label: &str, status: &LoadStatus, count: usize, empty_note: &str) -> String {
    match status {
        LoadStatus::Idle => label.to_owned(),
        LoadStatus::Loading => format!("{label} – loading…"),
        LoadStatus::Ready if count == 0 => format!("{label} – {empty_note}"),
        LoadStatus::Ready => format!("{label} ({count})"),
        LoadStatus::Failed(reason) => format!("{label} – failed: {reason}"),
    }
}

fn select_widget(
    label: &str,
    index: usize,
    options: usize,
    title: String,
    status: &LoadStatus,
    focused: bool,
) -> Paragraph<'static> {
    let text = if focused {
        format!("◂ {label} ▸  [{index}/{options}]")
    } else {
        label.to_owned()
    };
    let style = if status.is_failed() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    Paragraph::new(text)
        .style(style)
        .block(field_block(&title, focused))
}

fn text_field<'text>(label: &str, value: &'text str, focused: bool) -> Paragraph<'text> {
    let mut spans = vec![Span::raw(value)];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }
    Paragraph::new(Line::from(spans)).block(field_block(label, focused))
}

fn button(label: &str, focused: bool) -> Paragraph<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    Paragraph::new(label.to_owned())
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL))
}

fn field_block(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title.to_owned())
}

fn split_pair(area: Rect) -> [Rect; 2] {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    match halves.as_ref() {
        [left, right] => [*left, *right],
        _ => [area, area],
    }
}
