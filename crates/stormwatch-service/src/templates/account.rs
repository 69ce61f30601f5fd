//! Registration and task confirmation messages.

pub const VERIFY_SUBJECT: &str = "Verify Your Email";

pub fn verification_email(code: &str) -> String {
    format!("Your verification code is: {code}")
}

pub fn welcome_sms(name: &str, code: &str) -> String {
    format!(
        "🌟 Welcome to Weather App, {name}! 🌟\n\
         Your verification code is: {code}\n\
         Please verify within 10 minutes!"
    )
}

pub fn task_added_sms(task: &str, time: &str) -> String {
    format!(
        "✅ Task Added Successfully! ✅\n\
         Task: {task}\n\
         Time: {time}\n\
         We'll notify you 2 hours before with weather updates!"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_sms_carries_code() {
        let sms = welcome_sms("Asha", "482913");
        assert!(sms.starts_with("🌟 Welcome to Weather App, Asha! 🌟\n"));
        assert!(sms.contains("Your verification code is: 482913\n"));
        assert!(sms.ends_with("Please verify within 10 minutes!"));
    }

    #[test]
    fn test_task_added_sms_lines() {
        let sms = task_added_sms("Morning run", "06:30");
        assert_eq!(sms.lines().count(), 4);
        assert_eq!(sms.lines().nth(2), Some("Time: 06:30"));
    }
}
