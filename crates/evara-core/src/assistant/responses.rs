//! Fixed assistant texts.

/// Opening message of every conversation
pub const GREETING: &str = "Hello! I'm your wedding planning AI assistant. I can help you with theme ideas, vendor recommendations, timeline planning, budget suggestions, and much more. What would you like to know?";

/// Prompts offered before the first question
pub const SUGGESTED_QUESTIONS: [&str; 6] = [
    "What are some popular wedding themes for spring?",
    "How should I plan my wedding timeline?",
    "What vendors do I need to book first?",
    "Help me create a wedding budget",
    "What are some unique wedding ideas?",
    "How do I choose a wedding venue?",
];

/// Theme and style ideas
pub const THEMES: &str = "Here are some beautiful wedding themes to consider:\n\n• Rustic Elegance - Natural wood, greenery, and soft lighting\n• Modern Minimalist - Clean lines, neutral colors, and simple decor\n• Garden Romance - Floral arrangements, outdoor settings, and pastel colors\n• Vintage Charm - Antique details, lace, and classic elements\n• Bohemian Chic - Relaxed vibe, mixed textures, and earthy tones\n\nWould you like more details about any of these themes?";

/// Month-by-month planning timeline
pub const TIMELINE: &str = "Here's a recommended wedding planning timeline:\n\n12+ months before:\n• Set budget and guest list\n• Book venue and major vendors\n• Choose wedding party\n\n6-9 months before:\n• Order invitations\n• Book florist and photographer\n• Choose attire\n\n3-6 months before:\n• Send invitations\n• Plan ceremony details\n• Book transportation\n\n1-3 months before:\n• Final vendor meetings\n• Create seating chart\n• Confirm all details\n\nWould you like help with any specific part of the timeline?";

/// Which vendors to book first
pub const VENDORS: &str = "Priority vendors to book first:\n\n1. Venue - Books up fastest, determines date\n2. Photographer/Videographer - High demand for quality professionals\n3. Caterer - Essential for guest experience\n4. Band/DJ - Popular dates fill quickly\n5. Florist - Especially for peak seasons\n6. Hair & Makeup - For you and wedding party\n\nTip: Check out your Vendor Directory page to organize your vendor contacts! Would you like recommendations for any specific vendor type?";

/// Typical budget breakdown
pub const BUDGET: &str = "Here's a typical wedding budget breakdown:\n\n• Venue & Catering: 40-50%\n• Photography/Video: 10-15%\n• Flowers & Decor: 8-10%\n• Entertainment: 8-10%\n• Attire: 8-10%\n• Invitations: 2-3%\n• Miscellaneous: 5-10%\n\nTips for staying on budget:\n• Prioritize what matters most to you\n• Consider off-peak dates\n• DIY where possible\n• Track expenses in your checklist\n\nWhat's your approximate budget range?";

/// Venue selection checklist
pub const VENUE: &str = "Choosing the perfect venue:\n\nConsider these factors:\n• Guest capacity\n• Location accessibility\n• Indoor/outdoor options\n• Available dates\n• Included amenities\n• Backup plans for weather\n\nVenue types:\n• Ballrooms - Classic, climate-controlled\n• Gardens - Natural beauty, seasonal\n• Barns - Rustic charm, flexible\n• Beaches - Romantic, weather-dependent\n• Historic sites - Unique character\n\nWhat type of atmosphere are you envisioning?";

/// Ideas for making the day distinctive
pub const UNIQUE_IDEAS: &str = "Unique wedding ideas to make your day special:\n\n• Interactive food stations or food trucks\n• Signature cocktails named after your love story\n• Live painting of your ceremony\n• Surprise entertainment (flash mob, fireworks)\n• Personalized guest favors\n• Photo booth with custom props\n• Lawn games for outdoor receptions\n• Late-night snack bar\n• Custom wedding hashtag and social media wall\n\nWhat aspect of your wedding would you like to make more unique?";

/// Guest list and RSVP tracking
pub const GUEST_LIST: &str = "Managing your guest list effectively:\n\n• Start with your must-have guests\n• Consider venue capacity\n• Track RSVPs in your Guest List page\n• Note dietary restrictions\n• Plan for plus-ones\n• Send save-the-dates 6-8 months ahead\n• Send invitations 6-8 weeks before\n• Follow up with non-responders\n\nDon't forget to use the Guest List feature in Evara to track all this information! Need help with guest list etiquette?";

/// Shown when no topic keyword matches
pub const FALLBACK: &str = "That's a great question! I can help you with:\n\n• Wedding themes and styles\n• Planning timelines\n• Vendor recommendations\n• Budget planning\n• Venue selection\n• Guest list management\n• Unique ideas and inspiration\n\nCould you tell me more about what you're looking for? Or try one of the suggested questions below!";
