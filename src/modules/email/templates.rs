/// Function to build the verification link for a token
pub fn verification_link(base_url: &str, token: &str) -> String {
    format!("{}/verify/{}", base_url.trim_end_matches('/'), token)
}

/// Function to build the account verification email body
pub fn verification_email_body(verify_url: &str) -> String {
    format!(
        "Hello,\n\
        \n\
        Please verify your account by opening the link below:\n\
        \n\
        {}\n\
        \n\
        The link works exactly once. If you did not create this account,\n\
        you can safely ignore this email.\n\
        \n\
        Best regards,\n\
        The Credence Team",
        verify_url
    )
}
