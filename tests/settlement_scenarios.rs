use chrono::Utc;
use rust_decimal_macros::dec;
use settleup::application::ledger::LedgerService;
use settleup::domain::balance::Balances;
use settleup::domain::expense::NewExpense;
use settleup::domain::money::Balance;
use settleup::domain::participant::ParticipantId;
use settleup::domain::settlement::plan_settlement;
use settleup::error::LedgerError;
use settleup::infrastructure::in_memory::InMemoryLedgerStore;
use settleup::interfaces::text::summary_writer::render_summary;

async fn ledger() -> LedgerService {
    LedgerService::open(Box::new(InMemoryLedgerStore::new()))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_two_people_one_dinner() {
    let mut ledger = ledger().await;
    let alice = ledger.add_participant("Alice", None).await.unwrap().id;
    let bob = ledger.add_participant("Bob", None).await.unwrap().id;
    ledger
        .add_expense(NewExpense {
            amount: dec!(100),
            description: "Dinner".to_string(),
            payer_id: alice.clone(),
            participant_ids: vec![alice.clone(), bob.clone()],
        })
        .await
        .unwrap();

    let summary = ledger.summary(None).unwrap();
    assert_eq!(summary.balances.get(&alice), Some(Balance::new(dec!(50))));
    assert_eq!(summary.balances.get(&bob), Some(Balance::new(dec!(-50))));
    assert!(render_summary(&summary).contains("- Bob pays $ 50.00 to Alice\n"));
}

#[tokio::test]
async fn test_sole_creditor_of_three() {
    let mut ledger = ledger().await;
    let a = ledger.add_participant("A", None).await.unwrap().id;
    let b = ledger.add_participant("B", None).await.unwrap().id;
    let c = ledger.add_participant("C", None).await.unwrap().id;
    ledger
        .add_expense(NewExpense {
            amount: dec!(90),
            description: "Groceries".to_string(),
            payer_id: a.clone(),
            participant_ids: vec![a.clone(), b.clone(), c.clone()],
        })
        .await
        .unwrap();

    let summary = ledger.summary(None).unwrap();
    assert_eq!(summary.balances.get(&a), Some(Balance::new(dec!(60))));
    assert_eq!(summary.transfers.len(), 2);
    for transfer in &summary.transfers {
        assert_eq!(transfer.to, a);
        assert_eq!(transfer.amount.value(), dec!(30));
    }
    let payers: Vec<_> = summary.transfers.iter().map(|t| t.from.clone()).collect();
    assert!(payers.contains(&b) && payers.contains(&c));
}

#[test]
fn test_one_debtor_two_creditors() {
    let balances = Balances::from_entries([
        (ParticipantId::new("A"), Balance::new(dec!(-5))),
        (ParticipantId::new("B"), Balance::new(dec!(3))),
        (ParticipantId::new("C"), Balance::new(dec!(2))),
    ]);
    let plan = plan_settlement(&balances);

    assert_eq!(plan.len(), 2);
    assert_eq!(
        (plan[0].from.as_str(), plan[0].to.as_str(), plan[0].amount.value()),
        ("A", "B", dec!(3))
    );
    assert_eq!(
        (plan[1].from.as_str(), plan[1].to.as_str(), plan[1].amount.value()),
        ("A", "C", dec!(2))
    );
}

#[tokio::test]
async fn test_empty_split_is_rejected_before_computation() {
    let mut ledger = ledger().await;
    let a = ledger.add_participant("A", None).await.unwrap().id;
    let result = ledger
        .add_expense(NewExpense {
            amount: dec!(10),
            description: "Nothing".to_string(),
            payer_id: a,
            participant_ids: Vec::new(),
        })
        .await;

    assert!(matches!(result, Err(LedgerError::ValidationError(_))));
    assert!(ledger.summary(None).unwrap().is_settled());
}

#[test]
fn test_sub_cent_participant_gets_no_transfer() {
    let half_cent = ParticipantId::new("tiny");
    let balances = Balances::from_entries([
        (ParticipantId::new("A"), Balance::new(dec!(4.995))),
        (ParticipantId::new("B"), Balance::new(dec!(-5))),
        (half_cent.clone(), Balance::new(dec!(0.005))),
    ]);
    assert_eq!(balances.total(), dec!(0));

    let plan = plan_settlement(&balances);
    assert!(plan.iter().all(|t| t.from != half_cent && t.to != half_cent));
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].amount.value(), dec!(5));
}

#[tokio::test]
async fn test_timestamp_is_informational() {
    let mut ledger = ledger().await;
    let a = ledger.add_participant("A", None).await.unwrap().id;
    let before = Utc::now();
    let expense = ledger
        .add_expense(NewExpense {
            amount: dec!(1),
            description: "Gum".to_string(),
            payer_id: a.clone(),
            participant_ids: vec![a],
        })
        .await
        .unwrap();
    assert!(expense.timestamp >= before);
    assert!(ledger.summary(None).unwrap().is_settled());
}
