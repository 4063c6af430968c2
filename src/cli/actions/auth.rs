//! Signed-out actions: registration, verification, and session entry/exit.

use crate::auth::draft::RegistrationDraft;
use crate::auth::otp::{OtpCode, OtpInput, OtpTimer};
use crate::auth::{AuthFlow, SigninForm, SignupForm};
use crate::cli::actions::{AppContext, admit_private, admit_public};
use crate::cli::globals::GlobalArgs;
use crate::errors::FlowError;
use crate::session::SessionState;
use anyhow::Result;
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};

/// Execute the signup action: register the account, then move straight to
/// the verification screen.
/// # Errors
/// Returns an error if the form is invalid or the request cannot be delivered.
pub async fn signup(globals: &GlobalArgs, form: SignupForm) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if !admit_public(&ctx.session).await? {
        return Ok(());
    }
    let flow = ctx.auth_flow();
    let draft = flow.submit_signup(form).await?;
    println!("Verification code sent to {}.", draft.email);
    verify_screen(&flow, &draft, None).await
}

/// Execute the verify action: resume the stored registration and verify it.
/// # Errors
/// Returns an error if stored state cannot be read or the request cannot be delivered.
pub async fn verify(globals: &GlobalArgs, code: Option<String>) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if !admit_public(&ctx.session).await? {
        return Ok(());
    }
    let flow = ctx.auth_flow();
    let draft = match flow.resume_verification() {
        Ok(draft) => draft,
        Err(FlowError::MissingDraft) => {
            println!("No registration in progress. Run 'monujo signup' first.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    verify_screen(&flow, &draft, code).await
}

/// Execute the signin action.
/// # Errors
/// Returns an error if the form is invalid or the credentials are rejected.
pub async fn signin(globals: &GlobalArgs, form: SigninForm) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if !admit_public(&ctx.session).await? {
        return Ok(());
    }
    let identity = ctx.auth_flow().sign_in(form).await?;
    println!("Signed in as {} <{}>.", identity.name, identity.email);
    Ok(())
}

/// Execute the signout action.
/// # Errors
/// Returns an error if the request cannot be delivered.
pub async fn signout(globals: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if admit_private(&ctx.session).await?.is_none() {
        return Ok(());
    }
    ctx.auth_flow().sign_out().await?;
    println!("Signed out.");
    Ok(())
}

/// Execute the whoami action. Reports the probed session state; no gate
/// applies, signed out is a valid answer.
/// # Errors
/// Returns an error if the session probe cannot reach the server.
pub async fn whoami(globals: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    match ctx.session.current().await? {
        SessionState::Authenticated(identity) => {
            println!("Signed in as {} <{}>.", identity.name, identity.email);
            if !identity.roles.is_empty() {
                println!("Roles: {}", identity.roles.join(", "));
            }
        }
        _ => println!("Not signed in."),
    }
    Ok(())
}

/// Execute the forgot-password action. The confirmation is deliberately
/// neutral about whether the account exists.
/// # Errors
/// Returns an error if the email is invalid or the request cannot be delivered.
pub async fn forgot_password(globals: &GlobalArgs, email: &str) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if !admit_public(&ctx.session).await? {
        return Ok(());
    }
    ctx.auth_flow().forgot_password(email).await?;
    println!("If an account exists for {email}, a reset link is on its way.");
    Ok(())
}

/// Execute the reset-password action.
/// # Errors
/// Returns an error if the token or password is invalid or the request is rejected.
pub async fn reset_password(
    globals: &GlobalArgs,
    token: &str,
    new_password: &SecretString,
) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if !admit_public(&ctx.session).await? {
        return Ok(());
    }
    ctx.auth_flow().reset_password(token, new_password).await?;
    println!("Password updated. Run 'monujo signin' to continue.");
    Ok(())
}

/// The verification screen. With a code supplied it submits once; otherwise
/// it reads digits from stdin while the resend cooldown counts down.
async fn verify_screen(
    flow: &AuthFlow,
    draft: &RegistrationDraft,
    code: Option<String>,
) -> Result<()> {
    if let Some(raw) = code {
        let code = OtpCode::parse(&raw)?;
        let identity = flow.submit_otp(draft, &code).await?;
        println!(
            "Account verified. Signed in as {} <{}>.",
            identity.name, identity.email
        );
        return Ok(());
    }

    println!("Enter the 6-digit code sent to {}.", draft.email);
    println!("Type digits to fill the row; 'back' erases one, 'resend' requests a new code, 'quit' leaves.");

    let mut input = OtpInput::new();
    let mut timer = OtpTimer::new();

    // Skipped ticks are dropped rather than replayed, so the cooldown never
    // jumps down after a stall.
    let period = Duration::from_secs(1);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render_prompt(&timer, &input);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let was_locked = !timer.can_resend();
                timer.tick();
                if was_locked && timer.can_resend() {
                    println!("You can request a new code now; type 'resend'.");
                    render_prompt(&timer, &input);
                }
            }
            maybe_line = lines.next_line() => {
                let Some(line) = maybe_line? else {
                    println!("Verification postponed. Run 'monujo verify' to continue.");
                    return Ok(());
                };
                match line.trim() {
                    "" => {}
                    "quit" => {
                        println!("Verification postponed. Run 'monujo verify' to continue.");
                        return Ok(());
                    }
                    "back" => {
                        input.backspace();
                    }
                    "resend" => match flow.resend_code(draft, &mut timer).await {
                        Ok(true) => println!("A new code is on its way to {}.", draft.email),
                        Ok(false) => {
                            println!("Please wait {timer} before requesting another code.");
                        }
                        Err(FlowError::Rejected(message)) => println!("Resend failed: {message}"),
                        Err(err) => return Err(err.into()),
                    },
                    entry => {
                        feed(&mut input, entry);
                        if let Some(code) = input.code() {
                            match flow.submit_otp(draft, &code).await {
                                Ok(identity) => {
                                    println!(
                                        "Account verified. Signed in as {} <{}>.",
                                        identity.name, identity.email
                                    );
                                    return Ok(());
                                }
                                Err(FlowError::Rejected(message)) => {
                                    println!("Verification failed: {message}");
                                    input = OtpInput::new();
                                }
                                Err(err) => return Err(err.into()),
                            }
                        }
                    }
                }
                render_prompt(&timer, &input);
            }
        }
    }
}

/// Route one line of typed input into the entry row: a six-digit paste fills
/// the whole row at once, anything else feeds character by character.
fn feed(input: &mut OtpInput, entry: &str) {
    if input.paste(entry) {
        return;
    }
    for c in entry.chars() {
        input.push(c);
    }
}

fn render_prompt(timer: &OtpTimer, input: &OtpInput) {
    println!("[{timer}] code: {}", input.render());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_accepts_a_paste_or_single_digits() {
        let mut input = OtpInput::new();
        feed(&mut input, "123456");
        assert_eq!(input.render(), "1 2 3 4 5 6");

        let mut input = OtpInput::new();
        feed(&mut input, "12");
        feed(&mut input, "3");
        assert_eq!(input.render(), "1 2 3 _ _ _");
    }

    #[test]
    fn feed_ignores_noise_between_digits() {
        let mut input = OtpInput::new();
        feed(&mut input, "1a2b");
        assert_eq!(input.render(), "1 2 _ _ _ _");
    }
}
