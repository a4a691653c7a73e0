use bank_ledger::{
    AccountError, Bank, BankError, DirectoryError, EntryKind,
};
use rust_decimal::{Decimal, prelude::FromPrimitive};

fn amount(value: u32) -> Decimal {
    Decimal::from_u32(value).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn two_customers() {
    init_tracing();
    let bank = Bank::new("My Bank");

    let account1 = bank.create_account(1001, "John Doe", amount(1000)).unwrap();
    account1.deposit(amount(500)).unwrap();
    assert_eq!(account1.current_balance(), amount(1500));
    account1.withdraw(amount(200)).unwrap();
    assert_eq!(account1.current_balance(), amount(1300));

    let history = account1.history();
    let entries: Vec<_> = history.iter().map(|e| (e.kind, e.amount)).collect();
    assert_eq!(
        entries,
        vec![
            (EntryKind::Deposit, amount(500)),
            (EntryKind::Withdrawal, amount(200))
        ]
    );
    assert!(history.entries()[0].timestamp <= history.entries()[1].timestamp);

    let account2 = bank.create_account(1002, "Jane Smith", amount(2000)).unwrap();
    account2.deposit(amount(1000)).unwrap();
    assert_eq!(account2.current_balance(), amount(3000));
    assert_eq!(bank.total_balance().unwrap(), amount(4300));

    let err = bank
        .create_account(1001, "John Doe", amount(1000))
        .unwrap_err();
    assert_eq!(
        err,
        BankError::Directory(DirectoryError::DuplicateAccount { id: 1001 })
    );
    assert_eq!(account1.current_balance(), amount(1300));
    assert_eq!(bank.get_account(1001).unwrap().history().len(), 2);
}

#[test]
fn closing_an_account() {
    init_tracing();
    let bank = Bank::new("My Bank");
    let account = bank.create_account(1001, "John Doe", amount(1000)).unwrap();
    bank.create_account(1002, "Jane Smith", amount(2000)).unwrap();

    bank.close_account(1001).unwrap();
    assert_eq!(bank.total_balance().unwrap(), amount(2000));
    assert_eq!(
        account.withdraw(amount(1)).unwrap_err(),
        AccountError::AccountClosed { id: 1001 }
    );
    assert_eq!(
        bank.get_account(1001).unwrap_err().to_string(),
        "Account 1001 not found"
    );
    assert_eq!(
        bank.create_account(1001, "John Doe", amount(0))
            .unwrap_err()
            .to_string(),
        "Account 1001 already exists"
    );
    // the closed account keeps its last state for holders
    assert_eq!(account.current_balance(), amount(1000));
}

#[test]
fn summaries_serialize() {
    let bank = Bank::new("My Bank");
    bank.create_account(1, "John Doe", Decimal::new(1050, 2))
        .unwrap();
    let json = serde_json::to_string(&bank.accounts()).unwrap();
    assert_eq!(
        json,
        r#"[{"id":1,"owner":"John Doe","balance":"10.50","entries":0,"status":"open"}]"#
    );
}
