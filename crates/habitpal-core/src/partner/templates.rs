//! Fixed message pools the partner draws from.
//!
//! Templates containing `{habit}` are rendered with the habit title.

pub const WELCOME: [&str; 4] = [
    "Hi there! I'm your new accountability partner. I'm here to help you build great habits and achieve your goals. What would you like to work on first?",
    "Welcome! I'm excited to be your accountability partner on this journey. Together, we'll make sure you stay on track with your goals. What habits are you looking to develop?",
    "Hello! I'm your AI accountability buddy. I'm here to support, encourage, and sometimes give you that little push you need. What goals shall we tackle together?",
    "Great to meet you! As your accountability partner, I'll help you stay consistent with your habits. What areas of your life would you like to improve?",
];

pub const ENCOURAGEMENT: [&str; 4] = [
    "I know it can be tough sometimes, but remember why you started. Each small step matters!",
    "It's okay to feel tired. Take a short break, then get back to it. You've come too far to give up now.",
    "Progress isn't always linear. The fact that you're trying already puts you ahead of most people.",
    "Remember: discipline is choosing between what you want now and what you want most.",
];

pub const CELEBRATION: [&str; 4] = [
    "Fantastic job! Every completed task builds momentum toward your bigger goals.",
    "Way to go! Consistency is the key to transformation, and you're nailing it.",
    "Excellent work! It's these daily wins that add up to major life changes.",
    "You did it! Remember this feeling of accomplishment - it's what building good habits is all about.",
];

pub const ADVICE: [&str; 7] = [
    "Try habit stacking - attach your new habit to an existing one. For example, 'After I brush my teeth, I will meditate for 2 minutes.'",
    "Make your habit incredibly small to start. Want to read more? Begin with just one page per day. Consistency matters more than quantity.",
    "Design your environment for success. Make good habits obvious and easy, and bad habits invisible and difficult.",
    "Track your habits visually. The simple act of marking an X on a calendar can be surprisingly motivating.",
    "Use the 2-minute rule: Scale down any habit to something that takes just 2 minutes to start. This overcomes the initial resistance.",
    "Identify your habit triggers. Understanding what prompts your behaviors helps you change them.",
    "Join an accountability group or find a habit partner. Social expectations are powerful motivators.",
];

pub const GOAL_SETTING: [&str; 4] = [
    "When setting goals, use the SMART framework: Specific, Measurable, Achievable, Relevant, and Time-bound. This turns vague intentions into clear targets.",
    "Consider breaking your big goal into smaller milestones. Each milestone gives you a chance to celebrate and maintain motivation.",
    "Make sure your goals align with your values. The most sustainable habits are those that connect to what truly matters to you.",
    "Try setting process goals (what you'll do) rather than outcome goals (what you'll achieve). Focus on 'I will walk for 20 minutes daily' rather than 'I will lose 10 pounds.'",
];

pub const GENERIC: [&str; 4] = [
    "I'm here to support you! How can I help you with your habits today?",
    "Thanks for checking in. How are you progressing with your goals?",
    "I'm your accountability partner - let me know how I can help you stay on track.",
    "Remember, consistency is key to forming good habits. How can I help you today?",
];

pub const REMINDER: [&str; 4] = [
    "Hey there! Just a friendly reminder about your \"{habit}\" habit. Time to get it done!",
    "Don't forget about your \"{habit}\" habit today. You've got this!",
    "Quick reminder: It's time for \"{habit}\". Keeping up your streak depends on it!",
    "Your \"{habit}\" habit is waiting for you. A few minutes now will help build your long-term success.",
];

pub const CHALLENGE: [&str; 4] = [
    "I challenge you to complete your \"{habit}\" habit right now. No excuses - just 10 minutes of focused effort. Can you do that?",
    "Here's a challenge: do your \"{habit}\" habit today, but make it slightly more challenging than usual. Push your boundaries a little!",
    "Challenge time! Complete your \"{habit}\" habit today and send me a message right after you finish. I'll be waiting to hear from you.",
    "I believe you can do more than you think. Today, I challenge you to not only complete your \"{habit}\" habit but to do it with full focus and intention.",
];

pub fn render(template: &str, habit_title: &str) -> String {
    template.replace("{habit}", habit_title)
}
