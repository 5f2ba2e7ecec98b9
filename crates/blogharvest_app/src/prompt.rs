use console::style;
use dialoguer::{Confirm, Input};

/// Ask whether to restrict the run to one label. Unattended runs never ask.
pub fn wants_label_search() -> dialoguer::Result<bool> {
    if !console::user_attended() {
        return Ok(false);
    }
    Confirm::new()
        .with_prompt("Do you want to search by label/tag?")
        .default(false)
        .interact()
}

/// Print `labels` numbered from 1 and read a valid choice.
pub fn choose_label(labels: &[String]) -> dialoguer::Result<String> {
    println!("{}", style("Available labels/tags:").bold());
    for (idx, label) in labels.iter().enumerate() {
        println!("{:>4}. {}", idx + 1, label);
    }

    let count = labels.len();
    let choice: usize = Input::new()
        .with_prompt("Select a label by number")
        .validate_with(|n: &usize| -> Result<(), String> {
            if (1..=count).contains(n) {
                Ok(())
            } else {
                Err(format!("enter a number between 1 and {count}"))
            }
        })
        .interact_text()?;

    Ok(labels[choice - 1].clone())
}
