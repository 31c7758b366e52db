use std::fmt::Write as _;

use client_core::{DraftMode, ModalState, RegistryState};
use shared::{domain::CustomerField, protocol::Customer};

pub const SCREEN_TITLE: &str = "Cadastro de Clientes";
pub const LOADING_MESSAGE: &str = "Carregando clientes...";
pub const EMPTY_TABLE_MESSAGE: &str = "Nenhum cliente encontrado.";

const TABLE_COLUMNS: [CustomerField; 4] = [
    CustomerField::Code,
    CustomerField::Name,
    CustomerField::City,
    CustomerField::PostalCode,
];

pub fn search_button_label(loading: bool) -> &'static str {
    if loading {
        "Buscando..."
    } else {
        "Buscar"
    }
}

pub fn save_button_label(saving: bool) -> &'static str {
    if saving {
        "Salvando..."
    } else {
        "Salvar"
    }
}

pub fn modal_title(mode: &DraftMode) -> &'static str {
    match mode {
        DraftMode::Create => "Adicionar Cliente",
        DraftMode::Edit(_) => "Editar Cliente",
    }
}

/// `01001000` reads as `01001-000`; partial input is shown as typed.
pub fn display_postal_code(digits: &str) -> String {
    if digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        digits.to_string()
    }
}

fn cell(customer: &Customer, field: CustomerField) -> String {
    match field {
        CustomerField::PostalCode => display_postal_code(customer.text(field)),
        _ => customer.text(field).to_string(),
    }
}

pub fn render_filter_bar(state: &RegistryState) -> String {
    let filters = state.filters();
    let parts: Vec<String> = CustomerField::FILTER_BAR
        .iter()
        .map(|field| format!("{}: {}", field.label(), filters.get(*field).unwrap_or("-")))
        .collect();
    format!(
        "Filtros | {} | [{}] [Adicionar Novo]",
        parts.join(" | "),
        search_button_label(state.is_loading())
    )
}

pub fn render_table(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return EMPTY_TABLE_MESSAGE.to_string();
    }

    let mut header = vec!["ID".to_string()];
    header.extend(TABLE_COLUMNS.iter().map(|field| field.label().to_string()));
    let rows: Vec<Vec<String>> = customers
        .iter()
        .map(|customer| {
            let mut row = vec![customer
                .id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default()];
            row.extend(TABLE_COLUMNS.iter().map(|field| cell(customer, *field)));
            row
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out.truncate(out.trim_end().len());
    out
}

fn push_row(out: &mut String, values: &[String], widths: &[usize]) {
    let line: Vec<String> = values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{value:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

pub fn render_modal(state: &RegistryState) -> Option<String> {
    let (mode, saving) = match state.modal() {
        ModalState::Closed => return None,
        ModalState::Open(mode) => (mode, false),
        ModalState::Saving(mode) => (mode, true),
    };
    let draft = state.draft();
    let label_width = CustomerField::ALL
        .iter()
        .map(|field| field.label().chars().count())
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", modal_title(mode));
    for field in CustomerField::ALL {
        let label = field.label();
        let _ = writeln!(out, "  {label:<label_width$}  {}", cell(draft, field));
    }
    let _ = write!(out, "[Cancelar] [{}]", save_button_label(saving));
    Some(out)
}

pub fn render_screen(state: &RegistryState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{SCREEN_TITLE}");
    let _ = writeln!(out, "{}", render_filter_bar(state));
    let _ = writeln!(out);
    if state.is_loading() {
        let _ = writeln!(out, "{LOADING_MESSAGE}");
    } else {
        let _ = writeln!(out, "{}", render_table(state.customers()));
    }
    if let Some(modal) = render_modal(state) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{modal}");
    }
    out.truncate(out.trim_end().len());
    out
}

#[cfg(test)]
#[path = "../tests/render_tests.rs"]
mod tests;
