//! Two-phase posting draft.
//!
//! A posting is composed across two screens: the first captures name and
//! description, the second value, contact phone and team size. The draft
//! lives only in the local store between the steps and is submitted
//! atomically as a single creation call.

use serde::{Deserialize, Serialize};

use crate::api::validation::{parse_valor, validate_telefone};
use crate::db::CreatePostingRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Draft {
    /// Step 1 captured: name and description.
    Started { nome: String, descricao: String },
    /// Step 2 captured: ready to submit.
    Completed {
        nome: String,
        descricao: String,
        valor: String,
        telefone: String,
        numero_pessoas: Option<String>,
    },
}

impl Draft {
    /// Begin a draft from the first form step.
    pub fn start(nome: &str, descricao: &str) -> Result<Self, String> {
        if nome.trim().is_empty() {
            return Err("Project name is required".to_string());
        }
        if descricao.trim().is_empty() {
            return Err("Description is required".to_string());
        }

        Ok(Self::Started {
            nome: nome.trim().to_string(),
            descricao: descricao.trim().to_string(),
        })
    }

    /// Complete the draft with the second form step.
    pub fn complete(
        self,
        valor: &str,
        telefone: &str,
        numero_pessoas: Option<&str>,
    ) -> Result<Self, String> {
        let (nome, descricao) = match self {
            Self::Started { nome, descricao } => (nome, descricao),
            Self::Completed { nome, descricao, .. } => (nome, descricao),
        };

        if parse_valor(valor).is_none() {
            return Err("Value must be a number like 1.500,50".to_string());
        }
        validate_telefone(telefone)?;

        Ok(Self::Completed {
            nome,
            descricao,
            valor: valor.trim().to_string(),
            telefone: telefone.to_string(),
            numero_pessoas: numero_pessoas
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
        })
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Turn a completed draft into the single creation call payload. Fails
    /// on a draft still in step 1.
    pub fn into_request(self, email_autor: &str) -> Result<CreatePostingRequest, String> {
        match self {
            Self::Started { .. } => Err("Draft is missing value and contact details".to_string()),
            Self::Completed {
                nome,
                descricao,
                valor,
                telefone,
                numero_pessoas,
            } => Ok(CreatePostingRequest {
                nome: Some(nome),
                descricao: Some(descricao),
                valor: Some(valor),
                telefone: Some(telefone),
                numero_pessoas,
                email_autor: Some(email_autor.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_phase_flow_produces_a_creation_request() {
        let draft = Draft::start("Horta Comunitária", "Uma horta no bairro").unwrap();
        assert!(!draft.is_complete());

        let draft = draft
            .complete("1.500,50", "(11)98888-7777", Some("4"))
            .unwrap();
        assert!(draft.is_complete());

        let req = draft.into_request("a@b.com").unwrap();
        assert_eq!(req.nome.as_deref(), Some("Horta Comunitária"));
        assert_eq!(req.valor.as_deref(), Some("1.500,50"));
        assert_eq!(req.numero_pessoas.as_deref(), Some("4"));
        assert_eq!(req.email_autor.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn step_one_requires_name_and_description() {
        assert!(Draft::start("", "desc").is_err());
        assert!(Draft::start("Horta", "  ").is_err());
    }

    #[test]
    fn step_two_validates_value_and_phone() {
        let draft = Draft::start("Horta", "desc").unwrap();
        assert!(draft.clone().complete("abc", "(11)98888-7777", None).is_err());
        assert!(draft.clone().complete("100", "119888", None).is_err());

        let done = draft.complete("100", "(11)98888-7777", None).unwrap();
        match &done {
            Draft::Completed { numero_pessoas, .. } => assert!(numero_pessoas.is_none()),
            _ => panic!("draft should be complete"),
        }
    }

    #[test]
    fn started_draft_cannot_be_submitted() {
        let draft = Draft::start("Horta", "desc").unwrap();
        assert!(draft.into_request("a@b.com").is_err());
    }

    #[test]
    fn completing_twice_overwrites_step_two_fields() {
        let draft = Draft::start("Horta", "desc")
            .unwrap()
            .complete("100", "(11)98888-7777", Some("2"))
            .unwrap()
            .complete("200", "(11)99999-0000", None)
            .unwrap();

        let req = draft.into_request("a@b.com").unwrap();
        assert_eq!(req.valor.as_deref(), Some("200"));
        assert_eq!(req.telefone.as_deref(), Some("(11)99999-0000"));
        assert!(req.numero_pessoas.is_none());
    }

    #[test]
    fn draft_serialization_round_trips() {
        let draft = Draft::start("Horta", "desc").unwrap();
        let json = serde_json::to_string(&draft).unwrap();
        let back: Draft = serde_json::from_str(&json).unwrap();
        assert_eq!(draft, back);
    }
}
