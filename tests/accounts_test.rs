mod common;

use anyhow::Result;
use common::{business, create_funded, personal, test_service};
use drukbank::application::AppError;
use drukbank::domain::AccountKind;

#[test]
fn test_created_account_has_generated_credentials() -> Result<()> {
    let (service, _temp) = test_service()?;

    let account = service.create_account(personal("Pema"))?;
    assert_eq!(account.number.len(), 9);
    assert!(account.number.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(account.password.len(), 4);
    assert!(account.password.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(account.balance, 0);
    assert_eq!(account.kind(), AccountKind::Personal);

    Ok(())
}

#[test]
fn test_login_requires_exact_credentials() -> Result<()> {
    let (service, _temp) = test_service()?;
    let account = service.create_account(business("Druk Bakery"))?;

    let logged_in = service.login(&account.number, &account.password)?;
    assert_eq!(logged_in.number, account.number);
    assert_eq!(logged_in.kind(), AccountKind::Business);

    // Wrong password, unknown number, swapped arguments: all fail closed
    assert!(matches!(
        service.login(&account.number, "0000"),
        Err(AppError::AuthenticationFailure)
    ));
    assert!(matches!(
        service.login("000000000", &account.password),
        Err(AppError::AuthenticationFailure)
    ));
    assert!(matches!(
        service.login(&account.password, &account.number),
        Err(AppError::AuthenticationFailure)
    ));

    Ok(())
}

#[test]
fn test_login_is_case_sensitive_on_password() -> Result<()> {
    let (service, _temp) = test_service()?;
    let account = service.create_account(personal("Pema"))?;
    service.change_password(&account.number, "Secret")?;

    assert!(service.login(&account.number, "Secret").is_ok());
    assert!(matches!(
        service.login(&account.number, "secret"),
        Err(AppError::AuthenticationFailure)
    ));

    Ok(())
}

#[test]
fn test_delete_account_removes_record() -> Result<()> {
    let (service, _temp) = test_service()?;
    let account = service.create_account(personal("Pema"))?;

    service.delete_account(&account.number)?;

    assert!(matches!(
        service.login(&account.number, &account.password),
        Err(AppError::AuthenticationFailure)
    ));
    assert!(matches!(
        service.delete_account(&account.number),
        Err(AppError::AccountNotFound(_))
    ));

    Ok(())
}

#[test]
fn test_change_account_number_moves_the_record() -> Result<()> {
    let (service, _temp) = test_service()?;
    let account = create_funded(&service, personal("Pema"), 50000)?;
    let old_number = account.number.clone();

    let updated = service.change_account_number(&old_number, "111222333")?;
    assert_eq!(updated.number, "111222333");
    assert_eq!(updated.balance, 50000);
    assert_eq!(updated.password, account.password);
    assert_eq!(updated.holder, account.holder);

    // Old key gone, new key present
    assert!(matches!(
        service.account(&old_number),
        Err(AppError::AccountNotFound(_))
    ));
    assert_eq!(service.account("111222333")?.balance, 50000);

    Ok(())
}

#[test]
fn test_change_account_number_rejects_collision() -> Result<()> {
    let (service, _temp) = test_service()?;
    let first = service.create_account(personal("Pema"))?;
    let second = service.create_account(personal("Karma"))?;

    let result = service.change_account_number(&first.number, &second.number);
    assert!(matches!(result, Err(AppError::DuplicateAccountNumber(_))));

    // Both records still present, untouched
    assert_eq!(service.account(&first.number)?.number, first.number);
    assert_eq!(service.account(&second.number)?.number, second.number);

    Ok(())
}

#[test]
fn test_change_password_takes_effect_immediately() -> Result<()> {
    let (service, _temp) = test_service()?;
    let account = service.create_account(personal("Pema"))?;

    service.change_password(&account.number, "9876")?;

    assert!(matches!(
        service.login(&account.number, &account.password),
        Err(AppError::AuthenticationFailure)
    ));
    assert!(service.login(&account.number, "9876").is_ok());

    Ok(())
}

#[test]
fn test_generated_numbers_are_unique_in_store() -> Result<()> {
    let (service, _temp) = test_service()?;

    let mut numbers = std::collections::HashSet::new();
    for i in 0..20 {
        let account = service.create_account(personal(&format!("Holder {}", i)))?;
        assert!(numbers.insert(account.number));
    }

    Ok(())
}
