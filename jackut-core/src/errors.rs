//! Error types for the Jackut social model
//!
//! Every operation on [`SocialSystem`](crate::core_social::SocialSystem) fails with
//! exactly one [`JackutError`], raised at the first violated guard. Display texts
//! are the messages shown to end users.

use crate::core_social::types::{MessageQueue, Relation};
use thiserror::Error;

/// Result type for Jackut operations
pub type JackutResult<T> = Result<T, JackutError>;

/// Errors raised by the social model
#[derive(Debug, Error)]
pub enum JackutError {
    /// Malformed input, e.g. an empty login or password
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Conta com esse nome já existe.")]
    DuplicateAccount,

    #[error("Login ou senha inválidos.")]
    InvalidCredentials,

    #[error("Usuário não cadastrado.")]
    UserNotFound,

    #[error("Sessão inválida.")]
    InvalidSession,

    #[error("Atributo não preenchido.")]
    AttributeNotSet,

    /// The target listed the caller as an enemy; `name` is the target's display name
    #[error("Função inválida: {name} é seu inimigo.")]
    EnemyBlock { name: String },

    /// The caller pointed a relation at themselves
    #[error("{}", self_reference_text(.0))]
    SelfReference(Relation),

    #[error("Usuário não pode enviar recado para si mesmo.")]
    SelfMessage,

    /// The relation (or a pending friend invite) already exists
    #[error("{}", duplicate_relation_text(.0))]
    DuplicateRelation(Relation),

    /// The target is already a fan of the caller, so it cannot become an idol
    #[error("Usuário não pode adicionar como ídolo, pois já é fã.")]
    AlreadyFan,

    #[error("Comunidade não existe.")]
    CommunityNotFound,

    #[error("Comunidade com esse nome já existe.")]
    DuplicateCommunity,

    #[error("Usuario já faz parte dessa comunidade.")]
    AlreadyMember,

    #[error("{}", empty_queue_text(.0))]
    NoMessages(MessageQueue),

    /// Password could not be hashed, e.g. rejected argon2 parameters
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Whole-state snapshot could not be read or written
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Failures of the snapshot file
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode snapshot: {0}")]
    Encode(String),

    /// Header unreadable, or the body does not decode under its own version
    #[error("Snapshot is corrupt: {0}")]
    Corrupt(String),

    /// Written under another schema version
    #[error("Unsupported snapshot version: expected {expected}, got {actual}")]
    VersionMismatch { expected: u32, actual: u32 },
}

impl SnapshotError {
    /// Whether load should discard the file and start from an empty state
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, SnapshotError::VersionMismatch { .. })
    }
}

fn self_reference_text(relation: &Relation) -> &'static str {
    match relation {
        Relation::Friend | Relation::FriendInvite => {
            "Usuário não pode adicionar a si mesmo como amigo."
        }
        Relation::Idol => "Usuário não pode ser fã de si mesmo.",
        Relation::Crush => "Usuário não pode ser paquera de si mesmo.",
        Relation::Enemy => "Usuário não pode ser inimigo de si mesmo.",
    }
}

fn duplicate_relation_text(relation: &Relation) -> &'static str {
    match relation {
        Relation::Friend => "Usuário já está adicionado como amigo.",
        Relation::FriendInvite => {
            "Usuário já está adicionado como amigo, esperando aceitação do convite."
        }
        Relation::Idol => "Usuário já está adicionado como ídolo.",
        Relation::Crush => "Usuário já está adicionado como paquera.",
        Relation::Enemy => "Usuário já está adicionado como inimigo.",
    }
}

fn empty_queue_text(queue: &MessageQueue) -> &'static str {
    match queue {
        MessageQueue::Direct => "Não há recados.",
        MessageQueue::Community => "Não há mensagens.",
    }
}
