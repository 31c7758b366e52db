//! Commands typed at the session prompt.

use shared::{
    domain::{CustomerField, CustomerId},
    error::FieldError,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Filter { field: CustomerField, value: String },
    Search,
    New,
    Edit { id: CustomerId },
    Delete { id: CustomerId },
    Field { field: CustomerField, value: String },
    PostalCode { raw: String },
    Save,
    Cancel,
    Show,
    Help,
    Quit,
}

impl UiCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Filter { .. } => "filter",
            Self::Search => "search",
            Self::New => "new",
            Self::Edit { .. } => "edit",
            Self::Delete { .. } => "delete",
            Self::Field { .. } => "field",
            Self::PostalCode { .. } => "postal_code",
            Self::Save => "save",
            Self::Cancel => "cancel",
            Self::Show => "show",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("comando desconhecido '{0}'; digite 'ajuda'")]
    Unknown(String),
    #[error("uso: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Field(#[from] FieldError),
}

pub const HELP_TEXT: &str = "\
Comandos:
  filtro <campo> [valor]   altera um filtro (Codigo, Nome, Cidade, CEP); sem valor remove
  buscar                   lista os clientes com os filtros atuais
  novo                     abre o formulário para adicionar um cliente
  editar <id>              abre o formulário com o cliente da lista
  excluir <id>             exclui o cliente após confirmação
  campo <campo> [valor]    altera um campo do formulário
  cep <valor>              altera o CEP e preenche o endereço
  salvar                   salva o formulário
  cancelar                 fecha o formulário sem salvar
  mostrar                  redesenha a tela
  ajuda                    mostra esta ajuda
  sair                     encerra";

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<UiCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "filtro" | "filtrar" => {
            let (field, value) = field_and_value(rest, "filtro <campo> [valor]")?;
            if !field.is_filter_bar_field() {
                return Err(FieldError::NotFilterable(field.label().to_string()).into());
            }
            UiCommand::Filter { field, value }
        }
        "buscar" => UiCommand::Search,
        "novo" | "adicionar" => UiCommand::New,
        "editar" => UiCommand::Edit {
            id: required_id(rest, "editar <id>")?,
        },
        "excluir" => UiCommand::Delete {
            id: required_id(rest, "excluir <id>")?,
        },
        "campo" => {
            let (field, value) = field_and_value(rest, "campo <campo> [valor]")?;
            if field == CustomerField::PostalCode {
                UiCommand::PostalCode { raw: value }
            } else {
                UiCommand::Field { field, value }
            }
        }
        "cep" => UiCommand::PostalCode {
            raw: rest.to_string(),
        },
        "salvar" => UiCommand::Save,
        "cancelar" | "fechar" => UiCommand::Cancel,
        "mostrar" | "listar" => UiCommand::Show,
        "ajuda" | "?" => UiCommand::Help,
        "sair" => UiCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn field_and_value(
    rest: &str,
    usage: &'static str,
) -> Result<(CustomerField, String), CommandError> {
    let (name, value) = match rest.split_once(char::is_whitespace) {
        Some((name, value)) => (name, value.trim()),
        None => (rest, ""),
    };
    if name.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok((name.parse()?, value.to_string()))
}

fn required_id(rest: &str, usage: &'static str) -> Result<CustomerId, CommandError> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(CommandError::Usage(usage));
    }
    Ok(rest.parse().unwrap_or_else(|never| match never {}))
}

#[cfg(test)]
#[path = "../tests/commands_tests.rs"]
mod tests;
