//! 複数のユースケースを通したシナリオテスト

use crate::{
    domain::{BroadcastEvent, ChatRepository, MessageContent},
    usecase::{
        ChatError, CreateRoomUseCase, DeleteMessageUseCase, JoinRoomUseCase, SendMessageUseCase,
        test_support::{Harness, drain},
    },
};

#[tokio::test]
async fn test_create_join_send_delete_scenario() {
    // テスト項目: U1 がルームを作成し、U2 が参加・送信、U1 は削除でき、U2 は U1 の投稿を削除できない
    // given (前提条件):
    let harness = Harness::new();
    let u1 = harness.add_user("u1", "alice").await;
    let u2 = harness.add_user("u2", "bob").await;
    let (s1, mut rx1) = harness.connect().await;
    let (s2, mut rx2) = harness.connect().await;

    let create = CreateRoomUseCase::new(harness.verifier(), harness.repository(), harness.notifier());
    let join = JoinRoomUseCase::new(
        harness.verifier(),
        harness.repository(),
        harness.registry.clone(),
        harness.notifier(),
    );
    let send = SendMessageUseCase::new(
        harness.verifier(),
        harness.repository(),
        harness.queue(),
        harness.dispatcher.clone(),
        harness.notifier(),
    );
    let delete = DeleteMessageUseCase::new(
        harness.verifier(),
        harness.repository(),
        harness.dispatcher.clone(),
        harness.notifier(),
    );

    // when (操作):
    let room = create.execute("general", &u1).await.unwrap();
    join.execute(&s1, room.id.clone(), &u1).await.unwrap();
    join.execute(&s2, room.id.clone(), &u2).await.unwrap();
    let bobs = send
        .execute(room.id.clone(), MessageContent::new("from bob").unwrap(), &u2)
        .await
        .unwrap();
    let alices = send
        .execute(room.id.clone(), MessageContent::new("from alice").unwrap(), &u1)
        .await
        .unwrap();
    drain(&mut rx1);
    drain(&mut rx2);

    let bob_deletes_alice = delete
        .execute(room.id.clone(), alices.id.clone(), &u2)
        .await;
    let alice_deletes_bob = delete.execute(room.id.clone(), bobs.id.clone(), &u1).await;

    // then (期待する結果):
    assert_eq!(bob_deletes_alice, Err(ChatError::Forbidden));
    assert_eq!(alice_deletes_bob, Ok(()));

    let expected = BroadcastEvent::MessageDeleted {
        room_id: room.id.clone(),
        message_id: bobs.id.clone(),
    };
    for rx in [&mut rx1, &mut rx2] {
        let events = drain(rx);
        assert_eq!(events.len(), 1);
        assert_eq!(*events[0], expected);
    }

    let remaining = harness.repository.list_messages(&room.id).await.unwrap();
    assert_eq!(remaining, vec![alices]);
}
