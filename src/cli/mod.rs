use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;

use crate::application::{AppError, LedgerService};
use crate::domain::{Account, Cents, Holder, format_ngultrum, parse_amount};

/// Drukbank - flat-file banking ledger
#[derive(Parser)]
#[command(name = "drukbank")]
#[command(about = "A single-user banking ledger driven by terminal prompts")]
#[command(version)]
pub struct Cli {
    /// Account store file path
    #[arg(short, long, default_value = "accounts.txt")]
    pub store: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        if self.verbose {
            eprintln!("[drukbank] using store file {}", self.store);
        }
        let service = LedgerService::open(&self.store);
        let stdin = io::stdin();
        let mut session = Session::new(service, stdin.lock(), io::stdout());
        session.run()
    }
}

/// Interactive menu session over the ledger service. Generic over its
/// input and output so transcript tests can drive it with scripted stdin
/// and captured stdout.
///
/// Session states: logged out (top menu) and logged in (account menu);
/// login moves forward, logout or account deletion moves back.
pub struct Session<R: BufRead, W: Write> {
    service: LedgerService,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(service: LedgerService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Run the top-level menu loop until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "1. Create Account\n2. Login\n3. Exit")?;
            let Some(choice) = self.prompt("Enter choice: ")? else {
                break;
            };

            match choice.as_str() {
                "1" => self.create_account()?,
                "2" => self.login()?,
                "3" => {
                    writeln!(self.output, "Thank You!")?;
                    break;
                }
                _ => writeln!(self.output, "Invalid choice. Try again.")?,
            }
        }
        Ok(())
    }

    /// Print a prompt and read one trimmed line. `None` means end of
    /// input, which unwinds every menu loop.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn create_account(&mut self) -> Result<()> {
        let Some(kind) = self.prompt("Enter account type (Business/Personal): ")? else {
            return Ok(());
        };

        // Anything other than an exact "Business" falls back to Personal.
        let holder = if kind == "Business" {
            let Some(name) = self.prompt("Enter business name: ")? else {
                return Ok(());
            };
            Holder::Business {
                business_name: name,
            }
        } else {
            let Some(name) = self.prompt("Enter holder name: ")? else {
                return Ok(());
            };
            Holder::Personal { owner_name: name }
        };

        match self.service.create_account(holder) {
            Ok(account) => writeln!(
                self.output,
                "Account created! Your account number is {} and password is {}",
                account.number, account.password
            )?,
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn login(&mut self) -> Result<()> {
        let Some(number) = self.prompt("Enter account number: ")? else {
            return Ok(());
        };
        let Some(password) = self.prompt("Enter password: ")? else {
            return Ok(());
        };

        match self.service.login(&number, &password) {
            Ok(account) => {
                writeln!(self.output, "Welcome, {} account holder!", account.kind())?;
                self.account_menu(account)?;
            }
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    /// Authenticated menu loop. Returns when the user logs out, deletes
    /// the account, or input ends.
    fn account_menu(&mut self, mut account: Account) -> Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(
                self.output,
                "1. Deposit\n2. Withdraw\n3. Check Balance\n4. Transfer\n5. Delete Account\n6. Change Account Details\n7. Logout"
            )?;
            let Some(choice) = self.prompt("Enter choice: ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => {
                    let Some(amount) = self.prompt_amount("Enter amount to deposit: ")? else {
                        return Ok(());
                    };
                    let Some(amount) = amount else { continue };
                    match self.service.deposit(&account.number, amount) {
                        Ok(balance) => {
                            account.balance = balance;
                            writeln!(
                                self.output,
                                "Deposited {}. New balance: {}",
                                format_ngultrum(amount),
                                format_ngultrum(balance)
                            )?;
                        }
                        Err(err) => writeln!(self.output, "{}", err)?,
                    }
                }
                "2" => {
                    let Some(amount) = self.prompt_amount("Enter amount to withdraw: ")? else {
                        return Ok(());
                    };
                    let Some(amount) = amount else { continue };
                    match self.service.withdraw(&account.number, amount) {
                        Ok(balance) => {
                            account.balance = balance;
                            writeln!(
                                self.output,
                                "Withdrew {}. New balance: {}",
                                format_ngultrum(amount),
                                format_ngultrum(balance)
                            )?;
                        }
                        Err(AppError::InsufficientFunds { .. }) => {
                            writeln!(self.output, "Insufficient funds.")?;
                        }
                        Err(err) => writeln!(self.output, "{}", err)?,
                    }
                }
                "3" => match self.service.balance(&account.number) {
                    Ok(balance) => {
                        account.balance = balance;
                        writeln!(self.output, "Balance: {}", format_ngultrum(balance))?;
                    }
                    Err(err) => writeln!(self.output, "{}", err)?,
                },
                "4" => {
                    let Some(recipient) = self.prompt("Enter recipient account number: ")? else {
                        return Ok(());
                    };
                    let Some(amount) = self.prompt_amount("Enter amount to transfer: ")? else {
                        return Ok(());
                    };
                    let Some(amount) = amount else { continue };
                    match self.service.transfer(&account.number, &recipient, amount) {
                        Ok(receipt) => {
                            account.balance = receipt.sender_balance;
                            writeln!(
                                self.output,
                                "Transferred {} to account {}",
                                format_ngultrum(receipt.amount),
                                receipt.recipient
                            )?;
                        }
                        Err(AppError::AccountNotFound(_)) => {
                            writeln!(self.output, "Recipient account does not exist.")?;
                        }
                        Err(AppError::InsufficientFunds { .. }) => {
                            writeln!(self.output, "Insufficient funds.")?;
                        }
                        Err(err) => writeln!(self.output, "{}", err)?,
                    }
                }
                "5" => match self.service.delete_account(&account.number) {
                    Ok(()) => {
                        writeln!(self.output, "Account deleted successfully.")?;
                        return Ok(());
                    }
                    Err(err) => writeln!(self.output, "{}", err)?,
                },
                "6" => {
                    if !self.details_menu(&mut account)? {
                        return Ok(());
                    }
                }
                "7" => {
                    writeln!(self.output, "Logged out.")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    /// Account-detail submenu. Returns `false` when input ended.
    fn details_menu(&mut self, account: &mut Account) -> Result<bool> {
        writeln!(self.output)?;
        writeln!(self.output, "1. Change Account Number\n2. Change Password")?;
        let Some(choice) = self.prompt("Enter choice: ")? else {
            return Ok(false);
        };

        match choice.as_str() {
            "1" => {
                let Some(new_number) = self.prompt("Enter new account number: ")? else {
                    return Ok(false);
                };
                match self
                    .service
                    .change_account_number(&account.number, &new_number)
                {
                    Ok(updated) => {
                        *account = updated;
                        writeln!(self.output, "Account number changed successfully.")?;
                    }
                    Err(AppError::DuplicateAccountNumber(_)) => {
                        writeln!(self.output, "Account number already exists.")?;
                    }
                    Err(err) => writeln!(self.output, "{}", err)?,
                }
            }
            "2" => {
                let Some(new_password) = self.prompt("Enter new password: ")? else {
                    return Ok(false);
                };
                match self.service.change_password(&account.number, &new_password) {
                    Ok(()) => {
                        account.password = new_password;
                        writeln!(self.output, "Password changed successfully.")?;
                    }
                    Err(err) => writeln!(self.output, "{}", err)?,
                }
            }
            _ => writeln!(self.output, "Invalid choice.")?,
        }
        Ok(true)
    }

    /// Prompt for an amount. Outer `None` is end of input; inner `None`
    /// means the text did not parse and was already reported.
    fn prompt_amount(&mut self, text: &str) -> Result<Option<Option<Cents>>> {
        let Some(raw) = self.prompt(text)? else {
            return Ok(None);
        };
        match parse_amount(&raw) {
            Ok(amount) => Ok(Some(Some(amount))),
            Err(err) => {
                writeln!(self.output, "Invalid amount: {}.", err)?;
                Ok(Some(None))
            }
        }
    }
}
