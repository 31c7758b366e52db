use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Identifier assigned by the registry API. Kept in whatever JSON shape the
/// server used so it can be echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl CustomerId {
    /// Whether both ids print the same, so typed text finds a record whether
    /// the API sent its id as a number or a string. `007` never matches `7`.
    pub fn refers_to(&self, other: &CustomerId) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(n), Self::Text(t)) | (Self::Text(t), Self::Number(n)) => {
                *t == n.to_string()
            }
        }
    }
}

/// Ids typed by a user stay text exactly as given.
impl FromStr for CustomerId {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::Text(raw.trim().to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CustomerField {
    #[serde(rename = "Codigo")]
    Code,
    #[serde(rename = "Nome")]
    Name,
    #[serde(rename = "CPF_CNPJ")]
    TaxId,
    #[serde(rename = "CEP")]
    PostalCode,
    #[serde(rename = "Logradouro")]
    Street,
    #[serde(rename = "Bairro")]
    Neighborhood,
    #[serde(rename = "Numero")]
    Number,
    #[serde(rename = "Complemento")]
    Complement,
    #[serde(rename = "Cidade")]
    City,
    #[serde(rename = "UF")]
    State,
    #[serde(rename = "Fone")]
    Phone,
    #[serde(rename = "LimiteCredito")]
    CreditLimit,
    #[serde(rename = "Validade")]
    ExpiryDate,
}

impl CustomerField {
    /// Form order.
    pub const ALL: [CustomerField; 13] = [
        Self::Code,
        Self::Name,
        Self::TaxId,
        Self::PostalCode,
        Self::Street,
        Self::Neighborhood,
        Self::Number,
        Self::Complement,
        Self::City,
        Self::State,
        Self::Phone,
        Self::CreditLimit,
        Self::ExpiryDate,
    ];

    /// Fields offered by the filter bar.
    pub const FILTER_BAR: [CustomerField; 4] =
        [Self::Code, Self::Name, Self::City, Self::PostalCode];

    /// Name used on the wire, both in JSON bodies and as a query parameter.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Code => "Codigo",
            Self::Name => "Nome",
            Self::TaxId => "CPF_CNPJ",
            Self::PostalCode => "CEP",
            Self::Street => "Logradouro",
            Self::Neighborhood => "Bairro",
            Self::Number => "Numero",
            Self::Complement => "Complemento",
            Self::City => "Cidade",
            Self::State => "UF",
            Self::Phone => "Fone",
            Self::CreditLimit => "LimiteCredito",
            Self::ExpiryDate => "Validade",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Code => "Código",
            Self::Name => "Nome",
            Self::TaxId => "CPF/CNPJ",
            Self::PostalCode => "CEP",
            Self::Street => "Logradouro",
            Self::Neighborhood => "Bairro",
            Self::Number => "Número",
            Self::Complement => "Complemento",
            Self::City => "Cidade",
            Self::State => "UF",
            Self::Phone => "Fone",
            Self::CreditLimit => "Limite Crédito",
            Self::ExpiryDate => "Validade",
        }
    }

    pub fn is_filter_bar_field(self) -> bool {
        Self::FILTER_BAR.contains(&self)
    }
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for CustomerField {
    type Err = FieldError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', '/', ' '], "_");
        let field = match normalized.as_str() {
            "codigo" | "código" | "code" => Self::Code,
            "nome" | "name" => Self::Name,
            "cpf_cnpj" | "cpf" | "cnpj" => Self::TaxId,
            "cep" => Self::PostalCode,
            "logradouro" | "rua" => Self::Street,
            "bairro" => Self::Neighborhood,
            "numero" | "número" => Self::Number,
            "complemento" => Self::Complement,
            "cidade" => Self::City,
            "uf" | "estado" => Self::State,
            "fone" | "telefone" => Self::Phone,
            "limitecredito" | "limite_credito" | "limite" => Self::CreditLimit,
            "validade" => Self::ExpiryDate,
            _ => return Err(FieldError::UnknownField(raw.trim().to_string())),
        };
        Ok(field)
    }
}

/// Constraints narrowing the listed customers. A field that is absent places
/// no constraint; empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    fields: BTreeMap<CustomerField, String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: CustomerField, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, value);
        }
    }

    pub fn with(mut self, field: CustomerField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: CustomerField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CustomerField, &str)> + '_ {
        self.fields
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }

    /// Query parameters named identically to the record fields.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.wire_name(), value.clone()))
            .collect()
    }

    /// Parses `campo=valor` as typed on the command line.
    pub fn parse_pair(raw: &str) -> Result<(CustomerField, String), FieldError> {
        let (name, value) = raw
            .split_once('=')
            .ok_or_else(|| FieldError::MalformedFilter(raw.to_string()))?;
        let field: CustomerField = name.parse()?;
        Ok((field, value.to_string()))
    }
}
