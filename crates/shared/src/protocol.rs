use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{CustomerField, CustomerId};

/// A registry record. Every field is optional text; numbers sent by the API
/// are kept in their decimal string form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    #[serde(
        rename = "Codigo",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<String>,
    #[serde(
        rename = "Nome",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        rename = "CPF_CNPJ",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_id: Option<String>,
    #[serde(
        rename = "CEP",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub postal_code: Option<String>,
    #[serde(
        rename = "Logradouro",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub street: Option<String>,
    #[serde(
        rename = "Bairro",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub neighborhood: Option<String>,
    #[serde(
        rename = "Numero",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<String>,
    #[serde(
        rename = "Complemento",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub complement: Option<String>,
    #[serde(
        rename = "Cidade",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub city: Option<String>,
    #[serde(
        rename = "UF",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<String>,
    #[serde(
        rename = "Fone",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(
        rename = "LimiteCredito",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub credit_limit: Option<String>,
    #[serde(
        rename = "Validade",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_date: Option<String>,
    /// Members the registry API returned that this client does not model.
    /// Sent back untouched on update.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Customer {
    pub fn get(&self, field: CustomerField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Display value, empty when the field was never set.
    pub fn text(&self, field: CustomerField) -> &str {
        self.get(field).unwrap_or_default()
    }

    pub fn set(&mut self, field: CustomerField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Copy of the record as sent on create: the server assigns the id.
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }

    /// Overwrites the address fields resolved by a postal lookup.
    pub fn apply_address(&mut self, address: &AddressFragment) {
        self.street = Some(address.street.clone());
        self.neighborhood = Some(address.neighborhood.clone());
        self.city = Some(address.city.clone());
        self.state = Some(address.state.clone());
    }

    fn slot(&self, field: CustomerField) -> &Option<String> {
        match field {
            CustomerField::Code => &self.code,
            CustomerField::Name => &self.name,
            CustomerField::TaxId => &self.tax_id,
            CustomerField::PostalCode => &self.postal_code,
            CustomerField::Street => &self.street,
            CustomerField::Neighborhood => &self.neighborhood,
            CustomerField::Number => &self.number,
            CustomerField::Complement => &self.complement,
            CustomerField::City => &self.city,
            CustomerField::State => &self.state,
            CustomerField::Phone => &self.phone,
            CustomerField::CreditLimit => &self.credit_limit,
            CustomerField::ExpiryDate => &self.expiry_date,
        }
    }

    fn slot_mut(&mut self, field: CustomerField) -> &mut Option<String> {
        match field {
            CustomerField::Code => &mut self.code,
            CustomerField::Name => &mut self.name,
            CustomerField::TaxId => &mut self.tax_id,
            CustomerField::PostalCode => &mut self.postal_code,
            CustomerField::Street => &mut self.street,
            CustomerField::Neighborhood => &mut self.neighborhood,
            CustomerField::Number => &mut self.number,
            CustomerField::Complement => &mut self.complement,
            CustomerField::City => &mut self.city,
            CustomerField::State => &mut self.state,
            CustomerField::Phone => &mut self.phone,
            CustomerField::CreditLimit => &mut self.credit_limit,
            CustomerField::ExpiryDate => &mut self.expiry_date,
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Body of `GET /clientes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerListResponse {
    #[serde(default)]
    pub items: Vec<Customer>,
}

/// Street-level address resolved from a postal code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFragment {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// Body of `GET /{cep}/json/` on the postal-code service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostalLookupResponse {
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    #[serde(default)]
    pub erro: Option<Value>,
}

impl PostalLookupResponse {
    /// The service signals an unknown code with `"erro": true` (some
    /// deployments send the string `"true"`).
    pub fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => text.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn into_address(self) -> AddressFragment {
        AddressFragment {
            street: self.logradouro.unwrap_or_default(),
            neighborhood: self.bairro.unwrap_or_default(),
            city: self.localidade.unwrap_or_default(),
            state: self.uf.unwrap_or_default(),
        }
    }
}
