/*
    Social scenarios

    End-to-end flows through the Facade:
    - Enemy blocking across every targeted action
    - Community broadcast delivery
    - Friendship handshake from both sides
    - Profile attributes
    - Cascading user removal
*/

mod common;

use anyhow::Result;
use common::{open_facade, user_with_session};
use jackut_core::core_social::{MessageQueue, Relation};
use jackut_core::JackutError;
use tempfile::tempdir;

#[test]
fn enemy_blocks_friend_request() -> Result<()> {
    let dir = tempdir()?;
    let mut jackut = open_facade(dir.path());

    jackut.create_user("alice", "pw1", "Alice")?;
    jackut.create_user("bob", "pw2", "Bob")?;
    let bob = jackut.open_session("bob", "pw2")?;
    jackut.add_enemy(&bob, "alice")?;

    let alice = jackut.open_session("alice", "pw1")?;
    let err = jackut.add_friend(&alice, "bob").unwrap_err();

    assert!(matches!(err, JackutError::EnemyBlock { ref name } if name == "Bob"));
    assert_eq!(err.to_string(), "Função inválida: Bob é seu inimigo.");
    assert!(!jackut.is_enemy("alice", "bob")?);
    Ok(())
}

#[test]
fn community_broadcast_reaches_owner_and_member() -> Result<()> {
    let dir = tempdir()?;
    let mut jackut = open_facade(dir.path());

    let alice = user_with_session(&mut jackut, "alice", "Alice");
    let bob = user_with_session(&mut jackut, "bob", "Bob");

    jackut.create_community(&alice, "tech", "Tech folks")?;
    jackut.add_community_member("tech", "bob")?;
    jackut.send_community_message(&alice, "tech", "hello")?;

    assert_eq!(jackut.read_community_message(&alice)?, "hello");
    assert_eq!(jackut.read_community_message(&bob)?, "hello");

    let err = jackut.read_community_message(&bob).unwrap_err();
    assert!(matches!(err, JackutError::NoMessages(MessageQueue::Community)));
    assert_eq!(err.to_string(), "Não há mensagens.");
    Ok(())
}

#[test]
fn friendship_needs_both_sides() -> Result<()> {
    let dir = tempdir()?;
    let mut jackut = open_facade(dir.path());

    let alice = user_with_session(&mut jackut, "alice", "Alice");
    let bob = user_with_session(&mut jackut, "bob", "Bob");
    let carol = user_with_session(&mut jackut, "carol", "Carol");

    assert_eq!(jackut.friends("alice")?, "{}");

    jackut.add_friend(&alice, "bob")?;
    assert!(!jackut.is_friend("alice", "bob")?);
    let err = jackut.add_friend(&alice, "bob").unwrap_err();
    assert!(matches!(
        err,
        JackutError::DuplicateRelation(Relation::FriendInvite)
    ));

    // Unrelated activity in between does not matter
    jackut.add_friend(&carol, "alice")?;
    jackut.send_message(&carol, "bob", "oi")?;

    jackut.add_friend(&bob, "alice")?;
    assert!(jackut.is_friend("alice", "bob")?);
    assert!(jackut.is_friend("bob", "alice")?);
    assert_eq!(jackut.friends("bob")?, "{alice}");

    jackut.add_friend(&alice, "carol")?;
    assert_eq!(jackut.friends("alice")?, "{bob,carol}");
    Ok(())
}

#[test]
fn profile_name_defaults_to_display_name() -> Result<()> {
    let dir = tempdir()?;
    let mut jackut = open_facade(dir.path());

    let session = user_with_session(&mut jackut, "jpsl", "João Pedro");
    assert_eq!(jackut.user_attribute("jpsl", "name")?, "João Pedro");

    let err = jackut.user_attribute("jpsl", "estado").unwrap_err();
    assert_eq!(err.to_string(), "Atributo não preenchido.");

    jackut.edit_profile(&session, "estado", "Alagoas")?;
    assert_eq!(jackut.user_attribute("jpsl", "estado")?, "Alagoas");
    Ok(())
}

#[test]
fn credentials_and_sessions() -> Result<()> {
    let dir = tempdir()?;
    let mut jackut = open_facade(dir.path());
    jackut.create_user("jpsl", "senha", "João")?;

    assert_eq!(
        jackut.create_user("jpsl", "x", "Outro").unwrap_err().to_string(),
        "Conta com esse nome já existe."
    );
    assert_eq!(
        jackut.open_session("jpsl", "errada").unwrap_err().to_string(),
        "Login ou senha inválidos."
    );
    assert_eq!(
        jackut.edit_profile("nope", "a", "b").unwrap_err().to_string(),
        "Sessão inválida."
    );
    Ok(())
}

#[test]
fn idols_crushes_and_messages() -> Result<()> {
    let dir = tempdir()?;
    let mut jackut = open_facade(dir.path());

    let alice = user_with_session(&mut jackut, "alice", "Alice");
    let bob = user_with_session(&mut jackut, "bob", "Bob");

    jackut.add_idol(&alice, "bob")?;
    assert!(jackut.is_fan("alice", "bob")?);
    assert_eq!(jackut.fans("bob")?, "{alice}");
    assert_eq!(jackut.idols("alice")?, "{bob}");

    jackut.add_crush(&alice, "bob")?;
    assert!(jackut.is_crush("alice", "bob")?);
    assert!(!jackut.is_crush("bob", "alice")?);
    jackut.add_crush(&bob, "alice")?;

    assert_eq!(
        jackut.read_message(&bob)?,
        "Alice é seu paquera - Recado do Jackut."
    );
    assert_eq!(
        jackut.read_message(&alice)?,
        "Bob é seu paquera - Recado do Jackut."
    );
    assert_eq!(jackut.read_message(&alice).unwrap_err().to_string(), "Não há recados.");
    Ok(())
}

#[test]
fn removing_a_user_cascades() -> Result<()> {
    let dir = tempdir()?;
    let mut jackut = open_facade(dir.path());

    let alice = user_with_session(&mut jackut, "alice", "Alice");
    let bob = user_with_session(&mut jackut, "bob", "Bob");
    let carol = user_with_session(&mut jackut, "carol", "Carol");

    jackut.add_friend(&alice, "bob")?;
    jackut.add_friend(&bob, "alice")?;
    jackut.add_idol(&bob, "alice")?;
    jackut.create_community(&alice, "alice-fans", "Owned by alice")?;
    jackut.join_community(&bob, "alice-fans")?;
    jackut.create_community(&carol, "book-club", "Owned by carol")?;
    jackut.join_community(&alice, "book-club")?;
    jackut.send_message(&carol, "bob", "from carol")?;

    jackut.remove_user(&alice)?;

    assert_eq!(jackut.friends("bob")?, "{}");
    assert_eq!(jackut.idols("bob")?, "{}");
    assert_eq!(jackut.communities("bob")?, "{}");
    assert_eq!(jackut.community_members("book-club")?, "{carol}");
    assert!(matches!(
        jackut.community_owner("alice-fans"),
        Err(JackutError::CommunityNotFound)
    ));
    assert!(matches!(
        jackut.read_message(&bob),
        Err(JackutError::NoMessages(MessageQueue::Direct))
    ));
    assert!(matches!(
        jackut.user_attribute("alice", "name"),
        Err(JackutError::UserNotFound)
    ));
    assert!(matches!(
        jackut.open_session("alice", "pw"),
        Err(JackutError::InvalidCredentials)
    ));
    Ok(())
}
