//! `lib/auth-client.ts`: fixed shape, no configuration branches.

use super::ts_header;

pub fn render() -> String {
    let mut out = ts_header();
    out.push_str(
        r#"import { createAuthClient } from "better-auth/react";

export const authClient = createAuthClient({
  baseURL: process.env.NEXT_PUBLIC_BETTER_AUTH_URL,
});

export const { signIn, signUp, signOut, useSession } = authClient;
"#,
    );
    out
}
